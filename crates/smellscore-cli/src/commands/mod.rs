pub mod checklist;
pub mod init;
pub mod score;
