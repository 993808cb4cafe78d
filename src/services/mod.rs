pub mod developer_service;
pub mod skill_service;
