use anyhow::Result;
use teamfinder_core::config::RootConfig;
use teamfinder_infrastructure::ConfigService;

pub fn path(service: &ConfigService) {
    println!("{}", service.path().display());
}

/// Prints the resolved configuration with the anon key masked.
pub fn show(config: &RootConfig) -> Result<()> {
    let mut shown = config.clone();
    shown.supabase.anon_key = mask(&shown.supabase.anon_key);
    print!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

fn mask(secret: &str) -> String {
    match secret.char_indices().nth(4) {
        Some((cut, _)) => format!("{}…", &secret[..cut]),
        None if secret.is_empty() => String::new(),
        None => "****".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("abc"), "****");
        assert_eq!(mask("eyJhbGciOiJIUzI1NiJ9"), "eyJh…");
    }
}
