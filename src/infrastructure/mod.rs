// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_dataset_repository;
pub mod http_response;
pub mod view_mapper;
