pub mod path_processing;
pub mod shell_lexing;

pub use path_processing::expand_tilde;
pub use shell_lexing::{lex_shell_like, split_arguments, unquote};
