pub mod welcome;
pub mod wsroute;
