pub mod create_tag;
pub mod delete_tag;
pub mod get_tag;
pub mod list_tags;
pub mod update_tag;
