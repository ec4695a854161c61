//! Query modules: catalog inspection and row reads/writes.

pub mod catalog;
pub mod rows;

/// Quote an identifier for SQLite, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::quote_ident;

    #[test]
    fn quotes_embedded_quotes() {
        assert_eq!(quote_ident("votes"), "\"votes\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
