pub mod items;
pub mod monsters;
pub mod recipes;
