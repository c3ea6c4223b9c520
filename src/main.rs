use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use tracing_subscriber::EnvFilter;

use pt_booking::api::{ApiClient, BookingBackend};
use pt_booking::calendar::{Selection, classify};
use pt_booking::config::Config;
use pt_booking::error::BookingError;
use pt_booking::models::{Appointment, AppointmentStatus, NewBooking};
use pt_booking::portal::{CalendarView, ClientPortal, Notice, TrainerPortal};
use pt_booking::session::{FileSession, Role};

const USAGE: &str = "\
usage: pt-booking <command> [args]

trainer:
  trainer-login <username> <password>
  trainer-logout
  bookings
  calendar [YYYY-MM-DD]
  set-status <id> <pending|confirmed|completed>
  delete <id> [--yes]

client:
  register <name> <email> <password>
  client-login <email> <password>
  client-logout
  my-bookings
  book <name> <email> <YYYY-MM-DD> <time> [phone] [message]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    TrainerLogin { username: String, password: String },
    TrainerLogout,
    Bookings,
    Calendar { date: Option<NaiveDate> },
    SetStatus { id: i64, status: AppointmentStatus },
    Delete { id: i64, confirmed: bool },
    Register { name: String, email: String, password: String },
    ClientLogin { email: String, password: String },
    ClientLogout,
    MyBookings,
    Book(NewBooking),
}

fn parse_id(raw: &str) -> Result<i64, String> {
    raw.parse().map_err(|_| format!("invalid booking id: {raw}"))
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let cmd = match args.as_slice() {
        ["trainer-login", username, password] => Command::TrainerLogin {
            username: username.to_string(),
            password: password.to_string(),
        },
        ["trainer-logout"] => Command::TrainerLogout,
        ["bookings"] => Command::Bookings,
        ["calendar"] => Command::Calendar { date: None },
        ["calendar", date] => Command::Calendar {
            date: Some(
                NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|_| format!("invalid date (expected YYYY-MM-DD): {date}"))?,
            ),
        },
        ["set-status", id, status] => Command::SetStatus {
            id: parse_id(id)?,
            status: status.parse().map_err(|e| format!("{e}"))?,
        },
        ["delete", id] => Command::Delete {
            id: parse_id(id)?,
            confirmed: false,
        },
        ["delete", id, "--yes" | "-y"] | ["delete", "--yes" | "-y", id] => Command::Delete {
            id: parse_id(id)?,
            confirmed: true,
        },
        ["register", name, email, password] => Command::Register {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        },
        ["client-login", email, password] => Command::ClientLogin {
            email: email.to_string(),
            password: password.to_string(),
        },
        ["client-logout"] => Command::ClientLogout,
        ["my-bookings"] => Command::MyBookings,
        ["book", name, email, date, time, rest @ ..] if rest.len() <= 2 => {
            Command::Book(NewBooking {
                name: name.to_string(),
                email: email.to_string(),
                date: date.to_string(),
                time: time.to_string(),
                phone: rest.first().map(|s| s.to_string()).unwrap_or_default(),
                message: rest.get(1).map(|s| s.to_string()).unwrap_or_default(),
            })
        }
        _ => return Err(USAGE.to_string()),
    };
    Ok(cmd)
}

/// Ask before deleting. Anything but an explicit yes, including end of
/// input, keeps the booking.
fn confirm_delete(id: i64, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(out, "Are you sure you want to delete booking #{id}? [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn render_table(bookings: &[Appointment]) -> String {
    let mut out = format!(
        "{:>5}  {:<10}  {:<8}  {:<10}  {:<20}  {}\n",
        "ID", "DATE", "TIME", "STATUS", "NAME", "EMAIL"
    );
    for b in bookings {
        out.push_str(&format!(
            "{:>5}  {:<10}  {:<8}  {:<10}  {:<20}  {}\n",
            b.id,
            b.date,
            b.time,
            classify(&b.status).label(),
            b.name,
            b.email
        ));
    }
    out
}

fn render_calendar(view: &CalendarView<'_>) -> String {
    let markers = &view.markers;
    let mut out = format!("{}\n", markers.first_day().format("%B %Y"));
    out.push_str(" Mo  Tu  We  Th  Fr  Sa  Su\n");

    for week in markers.weeks() {
        for cell in week {
            match cell {
                Some(day) => {
                    let marked = markers
                        .first_day()
                        .with_day(day)
                        .is_some_and(|d| markers.has_appointments(d));
                    out.push_str(&format!("{day:>3}{}", if marked { '•' } else { ' ' }));
                }
                None => out.push_str("    "),
            }
        }
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&view.heading);
    out.push('\n');
    if view.entries.is_empty() {
        out.push_str("No bookings scheduled for this date.\n");
    }
    for entry in &view.entries {
        let a = entry.appointment;
        out.push_str(&format!(
            "  {} [{}] #{} {} <{}>  {}",
            entry.badge.glyph(),
            entry.badge.label(),
            a.id,
            a.name,
            a.email,
            a.time
        ));
        if !a.phone.is_empty() {
            out.push_str(&format!("  {}", a.phone));
        }
        out.push('\n');
        if !a.message.is_empty() {
            out.push_str(&format!("      {}\n", a.message));
        }
    }
    if view.unplaced > 0 {
        out.push_str(&format!(
            "({} booking(s) with an unreadable date are not shown)\n",
            view.unplaced
        ));
    }
    out
}

async fn run(
    cmd: Command,
    backend: Arc<dyn BookingBackend>,
    session: &mut FileSession,
) -> Result<Notice, BookingError> {
    let mut trainer = TrainerPortal::new(backend.clone());
    let client = ClientPortal::new(backend);

    let notice = match cmd {
        Command::TrainerLogin { username, password } => {
            let cred = trainer.login(session, &username, &password).await?;
            Notice::success(format!("Signed in as {}", cred.display_name))
        }
        Command::TrainerLogout => {
            trainer.logout(session);
            Notice::info("Signed out")
        }
        Command::Bookings => {
            trainer.load(session).await?;
            if trainer.store().is_empty() {
                Notice::info("No bookings yet.")
            } else {
                print!("{}", render_table(trainer.store().appointments()));
                Notice::info(format!("{} booking(s)", trainer.store().len()))
            }
        }
        Command::Calendar { date } => {
            trainer.load(session).await?;
            let selection = Selection::new(date);
            let today = Local::now().date_naive();
            print!("{}", render_calendar(&trainer.calendar(&selection, today)));
            Notice::info(format!("{} booking(s) loaded", trainer.store().len()))
        }
        Command::SetStatus { id, status } => {
            trainer.load(session).await?;
            trainer.update_status(session, id, status).await?;
            Notice::success(format!("Booking #{id} is now {status}"))
        }
        Command::Delete { id, .. } => {
            trainer.load(session).await?;
            trainer.delete(session, id).await?;
            Notice::success(format!("Booking #{id} deleted"))
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            client.register(&name, &email, &password).await?;
            Notice::success("Registration successful. You can now log in.")
        }
        Command::ClientLogin { email, password } => {
            let cred = client.login(session, &email, &password).await?;
            Notice::success(format!("Welcome, {}", cred.display_name))
        }
        Command::ClientLogout => {
            client.logout(session);
            Notice::info("Signed out")
        }
        Command::MyBookings => {
            let bookings = client.my_bookings(session).await?;
            if bookings.is_empty() {
                Notice::info("You have no bookings yet.")
            } else {
                print!("{}", render_table(&bookings));
                Notice::info(format!("{} booking(s)", bookings.len()))
            }
        }
        Command::Book(form) => {
            let created = client.submit_booking(session, &form).await?;
            Notice::success(format!(
                "Booking confirmed! We'll see you on {} at {} (#{}, {})",
                created.date, created.time, created.id, created.status
            ))
        }
    };
    Ok(notice)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = match parse_command(&args) {
        Ok(cmd) => cmd,
        Err(usage) => {
            eprintln!("{usage}");
            return Ok(ExitCode::from(2));
        }
    };

    if let Command::Delete { id, confirmed: false } = cmd {
        if !confirm_delete(id, &mut io::stdin().lock(), &mut io::stderr())? {
            println!("Booking #{id} kept");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let cfg = Config::from_env()?;
    let backend: Arc<dyn BookingBackend> = Arc::new(ApiClient::from_config(&cfg)?);
    let mut session = FileSession::open(&cfg.session_file);
    tracing::debug!(api_url = %cfg.api_url, session_file = %session.path().display(), "starting");

    match run(cmd, backend, &mut session).await {
        Ok(notice) => {
            println!("{notice}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            let notice = Notice::from(&err);
            eprintln!("error: {notice}");
            if let Some(role) = notice.login_required {
                let cmd = match role {
                    Role::Trainer => "trainer-login",
                    Role::Client => "client-login",
                };
                eprintln!("hint: sign in with `pt-booking {cmd}`");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
