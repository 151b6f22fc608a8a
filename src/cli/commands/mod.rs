pub mod session;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub(crate) fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in session::definitions()
        .into_iter()
        .chain(system::definitions())
    {
        registry.register(entry);
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_aliases_resolve_to_the_same_command() {
        let registry = registry();
        for name in ["close", "quit", "exit"] {
            assert_eq!(registry.get(name).map(|entry| entry.name), Some("close"));
        }
        assert!(registry.get("pick").is_some());
        assert!(registry.get("topic").is_some());
        assert!(registry.get("account").is_none());
    }
}
