use clap::{Arg, Command};

pub const ARG_ROLE: &str = "role";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_TOKEN: &str = "token";
pub const ARG_ROUTE: &str = "route";

fn role() -> Arg {
    Arg::new(ARG_ROLE)
        .long("role")
        .help("Account role")
        .required(true)
        .value_parser(["seller", "advisor"])
}

fn email() -> Arg {
    Arg::new(ARG_EMAIL)
        .long("email")
        .help("Account email")
        .required(true)
}

fn password() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long("password")
        .help("Account password")
        .env("ADVISOR_PORTAL_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn with_commands(command: Command) -> Command {
    command
        .subcommand(
            Command::new("login")
                .about("Log in and store the session")
                .arg(role())
                .arg(email())
                .arg(password()),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account")
                .arg(role())
                .arg(
                    Arg::new(ARG_FIRST_NAME)
                        .long("first-name")
                        .required(true),
                )
                .arg(Arg::new(ARG_LAST_NAME).long("last-name").required(true))
                .arg(email())
                .arg(password()),
        )
        .subcommand(Command::new("logout").about("Log out and clear the stored session"))
        .subcommand(Command::new("whoami").about("Show the current user"))
        .subcommand(
            Command::new("open")
                .about("Run the route guard for a client route")
                .arg(
                    Arg::new(ARG_ROUTE)
                        .help("Route path, for example /advisor-dashboard")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("forgot-password")
                .about("Request a password reset email")
                .arg(email()),
        )
        .subcommand(
            Command::new("reset-password")
                .about("Set a new password with a reset token")
                .arg(
                    Arg::new(ARG_TOKEN)
                        .long("token")
                        .help("Reset token from the email link"),
                )
                .arg(password()),
        )
        .subcommand(
            Command::new("verify-email")
                .about("Confirm an email address")
                .arg(
                    Arg::new(ARG_TOKEN)
                        .long("token")
                        .help("Verification token from the email link")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("password-strength")
                .about("Rate a password")
                .arg(Arg::new(ARG_PASSWORD).required(true)),
        )
}
