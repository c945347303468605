pub mod index_resource;
pub mod predict_resource;
pub mod recommend_resource;
