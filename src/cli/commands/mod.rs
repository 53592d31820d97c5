use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("gardisto")
        .about("Authentication gateway with attempt throttling")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("GARDISTO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("provider-url")
                .long("provider-url")
                .help("Auth provider base URL, example: https://<project>.supabase.co")
                .env("GARDISTO_PROVIDER_URL")
                .required(true),
        )
        .arg(
            Arg::new("provider-key")
                .long("provider-key")
                .help("Publishable API key used for credential operations")
                .env("GARDISTO_PROVIDER_KEY")
                .required(true),
        )
        .arg(
            Arg::new("provider-service-key")
                .long("provider-service-key")
                .help("Service role key for table writes and admin calls, defaults to the publishable key")
                .env("GARDISTO_PROVIDER_SERVICE_KEY"),
        )
        .arg(
            Arg::new("frontend-url")
                .long("frontend-url")
                .help("Browser origin allowed by CORS")
                .default_value("http://localhost:5173")
                .env("GARDISTO_FRONTEND_URL"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("GARDISTO_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "gardisto");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Authentication gateway with attempt throttling"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_check_port_and_provider() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "gardisto",
            "--port",
            "8080",
            "--provider-url",
            "https://project.supabase.co",
            "--provider-key",
            "anon-key",
            "--provider-service-key",
            "service-key",
        ]);

        assert_eq!(matches.get_one::<u16>("port").map(|s| *s), Some(8080));
        assert_eq!(
            matches
                .get_one::<String>("provider-url")
                .map(|s| s.to_string()),
            Some("https://project.supabase.co".to_string())
        );
        assert_eq!(
            matches
                .get_one::<String>("provider-key")
                .map(|s| s.to_string()),
            Some("anon-key".to_string())
        );
        assert_eq!(
            matches
                .get_one::<String>("provider-service-key")
                .map(|s| s.to_string()),
            Some("service-key".to_string())
        );
        assert_eq!(
            matches
                .get_one::<String>("frontend-url")
                .map(|s| s.to_string()),
            Some("http://localhost:5173".to_string())
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("GARDISTO_PROVIDER_URL", Some("https://project.supabase.co")),
                ("GARDISTO_PROVIDER_KEY", Some("anon-key")),
                ("GARDISTO_PORT", Some("443")),
                ("GARDISTO_FRONTEND_URL", Some("https://rrhh.example.com")),
                ("GARDISTO_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["gardisto"]);
                assert_eq!(matches.get_one::<u16>("port").map(|s| *s), Some(443));
                assert_eq!(
                    matches
                        .get_one::<String>("provider-url")
                        .map(|s| s.to_string()),
                    Some("https://project.supabase.co".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>("frontend-url")
                        .map(|s| s.to_string()),
                    Some("https://rrhh.example.com".to_string())
                );
                assert_eq!(matches.get_one::<u8>("verbosity").map(|s| *s), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("GARDISTO_LOG_LEVEL", Some(level)),
                    ("GARDISTO_PROVIDER_URL", Some("https://project.supabase.co")),
                    ("GARDISTO_PROVIDER_KEY", Some("anon-key")),
                ],
                || {
                    let command = new();
                    let matches = command.get_matches_from(vec!["gardisto"]);
                    assert_eq!(
                        matches.get_one::<u8>("verbosity").map(|s| *s),
                        Some(index as u8)
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("GARDISTO_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "gardisto".to_string(),
                    "--provider-url".to_string(),
                    "https://project.supabase.co".to_string(),
                    "--provider-key".to_string(),
                    "anon-key".to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").map(|s| *s),
                    Some(index as u8)
                );
            });
        }
    }
}
