pub mod follow_repo;
