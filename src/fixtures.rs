#[cfg(test)]
pub mod test {
    use toml::Table;

    use crate::bounds::BoundedInt;
    use crate::flags::{FlagDeclaration, FlagSet};

    pub fn table(toml_str: &str) -> Table {
        toml_str.parse::<Table>().unwrap()
    }

    /// Set a process environment variable for a test.
    ///
    /// Every caller uses a variable name no other test touches, so parallel
    /// tests never race on the same key.
    pub fn set_env(key: &str, value: &str) {
        // SAFETY: keys are unique per test and never read by other threads.
        unsafe { std::env::set_var(key, value) };
    }

    /// A small `serve` command with one flag of each kind.
    pub fn serve_flags() -> FlagSet {
        FlagSet::new("serve")
            .flag(FlagDeclaration::string("host", "localhost", "Address to bind"))
            .flag(
                FlagDeclaration::int("port", BoundedInt::new(1, 8080, 65535), "Port to listen on")
                    .short('p'),
            )
            .flag(FlagDeclaration::bool("verbose", false, "Log every request").short('v'))
    }

    #[test]
    fn serve_flags_has_one_of_each_kind() {
        let set = serve_flags();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("port").unwrap().short, Some('p'));
        assert_eq!(set.get("host").unwrap().short, None);
    }
}
