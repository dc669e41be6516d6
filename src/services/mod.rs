pub mod card_repository;
pub mod card_service;
pub mod health_service;
