use clap::{Arg, ArgAction, Command};

pub const ARG_FILE: &str = "file";
pub const ARG_LOGO: &str = "logo";
pub const ARG_TESTIMONIAL: &str = "testimonial";
pub const ARG_DRAFT: &str = "draft";
pub const ARG_SORT: &str = "sort";

fn profile_file() -> Arg {
    Arg::new(ARG_FILE)
        .long("file")
        .help("JSON file with the profile fields")
        .required(true)
}

#[must_use]
pub fn with_commands(command: Command) -> Command {
    command
        .subcommand(
            Command::new("advisor-profile")
                .about("Create the advisor profile")
                .arg(profile_file())
                .arg(Arg::new(ARG_LOGO).long("logo").help("Logo image to upload")),
        )
        .subcommand(
            Command::new("advisor-upload")
                .about("Upload logo and testimonials, then create the advisor profile")
                .arg(
                    Arg::new(ARG_LOGO)
                        .long("logo")
                        .help("Logo image to upload")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_TESTIMONIAL)
                        .long("testimonial")
                        .help("Testimonial as NAME|TEXT|PDF_PATH")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new(ARG_DRAFT)
                        .long("draft")
                        .help("JSON file with the profile fields filled in so far"),
                ),
        )
        .subcommand(Command::new("advisor-dashboard").about("Show the advisor dashboard"))
        .subcommand(
            Command::new("seller-profile")
                .about("Create the seller profile")
                .arg(profile_file()),
        )
        .subcommand(
            Command::new("seller-update")
                .about("Update the seller profile")
                .arg(profile_file()),
        )
        .subcommand(
            Command::new("seller-dashboard")
                .about("Show the seller profile and advisor matches")
                .arg(
                    Arg::new(ARG_SORT)
                        .long("sort")
                        .default_value("newest")
                        .value_parser(["newest", "years", "company"]),
                ),
        )
}
