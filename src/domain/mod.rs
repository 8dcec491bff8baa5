pub mod ai;
pub mod blast;
pub mod cell;
pub mod entity;
pub mod grid;
pub mod pathfind;
pub mod rules;
