pub mod aggregation_service;
pub mod allocation_service;
pub mod position_service;
pub mod quote_service;
