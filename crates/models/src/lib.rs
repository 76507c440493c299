pub mod db;
pub mod errors;

pub mod customer;
pub mod item;
pub mod order;
pub mod order_item;
