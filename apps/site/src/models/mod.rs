pub mod contact;
pub mod timeline;
