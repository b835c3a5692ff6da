use std::path::PathBuf;

use clap::Parser;

use crate::document::check_txt_extension;
use crate::errors::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::pipeline::AssessmentRequest;

#[derive(Parser, Debug)]
#[command(
    name = "resume-assessor",
    about = "Redact PII from a resume and score it against a job description",
    version
)]
pub struct Cli {
    /// Path to the candidate resume (.txt)
    #[arg(short = 'r', long = "resume", value_parser = parse_txt_path)]
    pub resume: PathBuf,
    /// Path to the job description (.txt)
    #[arg(short = 'p', long = "position", value_parser = parse_txt_path)]
    pub position: PathBuf,
}

impl Cli {
    pub fn into_request(self) -> AssessmentRequest {
        AssessmentRequest {
            resume_path: self.resume,
            position_path: self.position,
        }
    }
}

/// Exit status for a failed parse. Help and version requests go to stdout
/// and are not failures; every usage error exits 1 rather than clap's 2.
pub fn argument_error_status(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

fn parse_txt_path(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    check_txt_extension(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_short_and_long_flags() {
        let cli = Cli::try_parse_from(["resume-assessor", "-r", "cv.txt", "--position", "jd.TXT"])
            .unwrap();
        assert_eq!(cli.resume, PathBuf::from("cv.txt"));
        assert_eq!(cli.position, PathBuf::from("jd.TXT"));

        let request = cli.into_request();
        assert_eq!(request.resume_path, PathBuf::from("cv.txt"));
        assert_eq!(request.position_path, PathBuf::from("jd.TXT"));
    }

    #[test]
    fn test_both_flags_are_required() {
        let err = Cli::try_parse_from(["resume-assessor", "-r", "cv.txt"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_non_txt_path_is_rejected_at_parse_time() {
        let err = Cli::try_parse_from(["resume-assessor", "-r", "cv.pdf", "-p", "jd.txt"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains(".txt"), "{err}");
    }

    #[test]
    fn test_help_and_version_exit_with_success() {
        let help = Cli::try_parse_from(["resume-assessor", "--help"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
        assert_eq!(argument_error_status(&help), 0);

        let version = Cli::try_parse_from(["resume-assessor", "--version"]).unwrap_err();
        assert_eq!(version.kind(), ErrorKind::DisplayVersion);
        assert_eq!(argument_error_status(&version), 0);
    }

    #[test]
    fn test_usage_errors_exit_with_one() {
        for args in [
            vec!["resume-assessor", "-r", "cv.txt"],
            vec!["resume-assessor", "-r", "cv.pdf", "-p", "jd.txt"],
            vec!["resume-assessor", "-r", "cv.txt", "-p", "jd.txt", "--verbose"],
        ] {
            let err = Cli::try_parse_from(args.clone()).unwrap_err();
            assert_eq!(argument_error_status(&err), 1, "{args:?}");
        }
    }
}
