use clap::Parser;

/// Batch converter. Every argument is handed to cwebp unchanged; folders, thread count and
/// the rest come from `webpbatch.toml` in the working directory.
#[derive(Clone, Debug, Parser)]
#[command(name = "webpbatch")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Arguments passed verbatim to the converter before each input/output pair, e.g. `-q 80 -mt`.
    #[arg(
        value_name = "CONVERTER_ARGS",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub converter_args: Vec<String>,
}

impl Cli {
    /// The shared arguments as the single space-joined string shown to the user.
    pub fn joined_args(&self) -> String {
        self.converter_args.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments() {
        let cli = Cli::try_parse_from(["webpbatch"]).unwrap();
        assert!(cli.converter_args.is_empty());
        assert_eq!(cli.joined_args(), "");
    }

    #[test]
    fn flags_pass_through_untouched() {
        let cli =
            Cli::try_parse_from(["webpbatch", "-q", "80", "--help", "-V", "-metadata", "all"])
                .unwrap();
        assert_eq!(
            cli.converter_args,
            vec!["-q", "80", "--help", "-V", "-metadata", "all"]
        );
        assert_eq!(cli.joined_args(), "-q 80 --help -V -metadata all");
    }
}
