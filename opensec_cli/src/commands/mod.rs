pub mod prices;
pub mod quote;
pub mod stocks;
