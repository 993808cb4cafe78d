pub mod developer;
pub mod employer;
pub mod skill;
