pub mod availability_service;
pub mod booking_controller;
pub mod booking_validator;
pub mod hotel_api;
pub mod pricing_service;
pub mod stay_service;
