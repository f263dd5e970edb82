//! Delimited-text reading utilities.

mod reader;
mod tokenizer;

pub use reader::{
    MAX_FILE_SIZE, check_file_size, check_file_size_with_limit, delimited_rows, open_delimited,
    validate_encoding,
};
pub use tokenizer::{render_line, tokenize_line, validate_delimiter};
