pub mod net_pay;
pub mod rates;
