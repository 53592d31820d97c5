use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub provider_url: String,
    pub provider_key: SecretString,
    pub provider_service_key: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(purl: String) -> Self {
        Self {
            provider_url: purl,
            provider_key: SecretString::default(),
            provider_service_key: SecretString::default(),
        }
    }

    pub fn set_keys(&mut self, key: SecretString, service_key: SecretString) {
        self.provider_key = key;
        self.provider_service_key = service_key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let purl = "https://project.supabase.co".to_string();
        let args = GlobalArgs::new(purl);
        assert_eq!(args.provider_url, "https://project.supabase.co");
        assert_eq!(args.provider_key.expose_secret(), "");
        assert_eq!(args.provider_service_key.expose_secret(), "");
    }

    #[test]
    fn test_set_keys() {
        let mut args = GlobalArgs::new("https://project.supabase.co".to_string());
        args.set_keys(
            SecretString::from("anon".to_string()),
            SecretString::from("service".to_string()),
        );
        assert_eq!(args.provider_key.expose_secret(), "anon");
        assert_eq!(args.provider_service_key.expose_secret(), "service");
    }
}
