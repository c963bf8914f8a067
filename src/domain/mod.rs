pub mod matcher;
pub mod models;
pub mod normalize;
pub mod projects_list;
pub mod query;
pub mod ranking;
