pub mod answer_key;
pub mod attr;
pub mod compare;
pub mod init;
pub mod readme;
pub mod validate;
