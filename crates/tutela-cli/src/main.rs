//! tutela admin CLI.
//!
//! A thin presentation layer over the JSON API: it formats input and output
//! and holds no business rules. Point it at a running `tutela-server` with
//! `--url` (default `http://127.0.0.1:8385`).

mod client;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tutela_core::{grades::UnitGrades, record::RecordOverview, student::StudentProfile};
use uuid::Uuid;

use client::{ApiClient, SubmissionRequest};

#[derive(Parser)]
#[command(author, version, about = "tutela academic record tracker")]
struct Cli {
  /// Base URL of the tutela server.
  #[arg(long, default_value = "http://127.0.0.1:8385")]
  url: String,

  #[command(subcommand)]
  command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
  InProgress,
  Approved,
  Failed,
  Withdrawn,
}

impl StatusArg {
  fn as_str(self) -> &'static str {
    match self {
      Self::InProgress => "in_progress",
      Self::Approved => "approved",
      Self::Failed => "failed",
      Self::Withdrawn => "withdrawn",
    }
  }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SeverityArg {
  Low,
  Medium,
  High,
}

impl SeverityArg {
  fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
    }
  }
}

#[derive(Subcommand)]
enum Command {
  /// List enrollment records, optionally filtered by status.
  Records {
    #[arg(long)]
    status: Option<StatusArg>,
  },

  /// Submit a grade sheet: upserts the student and creates a new record.
  Submit(SubmitArgs),

  /// Withdraw a record, attaching a high-severity risk factor.
  Withdraw {
    record_id: Uuid,
    /// Risk category explaining the withdrawal.
    #[arg(long)]
    category:  Uuid,
    #[arg(long)]
    notes:     Option<String>,
  },

  /// List the risk factors attached to a record.
  Risks { record_id: Uuid },

  /// Attach a risk factor to a record without withdrawing it.
  Attach {
    record_id: Uuid,
    #[arg(long)]
    category:  Uuid,
    #[arg(long)]
    severity:  SeverityArg,
    #[arg(long)]
    notes:     Option<String>,
  },

  /// List records whose withdrawal never completed.
  Reconcile,

  /// Look up a student by control number.
  Student { control_number: String },

  /// Manage academic programs.
  Programs {
    #[command(subcommand)]
    action: ProgramCmd,
  },

  /// Manage subjects.
  Subjects {
    #[command(subcommand)]
    action: SubjectCmd,
  },

  /// Manage risk categories.
  Categories {
    #[command(subcommand)]
    action: CategoryCmd,
  },
}

#[derive(clap::Args)]
struct SubmitArgs {
  #[arg(long)]
  control_number:   String,
  #[arg(long)]
  given_name:       String,
  #[arg(long)]
  paternal_surname: String,
  #[arg(long)]
  maternal_surname: String,
  /// Program the student is enrolled in.
  #[arg(long)]
  program:          Option<Uuid>,
  #[arg(long)]
  current_semester: u32,
  /// Subject the grades are for.
  #[arg(long)]
  subject:          Uuid,
  /// Semester the subject was taken in.
  #[arg(long)]
  semester:         u32,
  #[arg(long)]
  unit1:            Option<f64>,
  #[arg(long)]
  unit2:            Option<f64>,
  #[arg(long)]
  unit3:            Option<f64>,
  #[arg(long)]
  attendance:       Option<f64>,
}

#[derive(Subcommand)]
enum ProgramCmd {
  List,
  Add {
    #[arg(long)]
    name: String,
    #[arg(long)]
    code: Option<String>,
  },
  Remove { id: Uuid },
}

#[derive(Subcommand)]
enum SubjectCmd {
  List {
    #[arg(long)]
    program: Option<Uuid>,
  },
  Add {
    #[arg(long)]
    name:     String,
    #[arg(long)]
    code:     Option<String>,
    #[arg(long)]
    semester: u32,
    #[arg(long)]
    program:  Option<Uuid>,
  },
  Remove { id: Uuid },
}

#[derive(Subcommand)]
enum CategoryCmd {
  List,
  Add {
    #[arg(long)]
    name:        String,
    #[arg(long)]
    description: Option<String>,
  },
  Remove { id: Uuid },
}

fn print_overviews(overviews: &[RecordOverview]) {
  if overviews.is_empty() {
    println!("no records");
    return;
  }
  println!(
    "{:<36}  {:<10}  {:<28}  {:<20}  {:>3}  {:>7}  {:<11}  {:>5}",
    "record", "control", "student", "subject", "sem", "grade", "status", "risks",
  );
  for view in overviews {
    let grade = view
      .final_grade
      .map(|g| format!("{g:.2}"))
      .unwrap_or_else(|| "-".to_owned());
    println!(
      "{:<36}  {:<10}  {:<28}  {:<20}  {:>3}  {:>7}  {:<11}  {:>5}",
      view.record_id,
      view.control_number,
      format!(
        "{} {}, {}",
        view.paternal_surname, view.maternal_surname, view.given_name
      ),
      view.subject_name,
      view.semester,
      grade,
      view.status.to_string(),
      view.risk_count,
    );
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let api = ApiClient::new(cli.url)?;

  match cli.command {
    Command::Records { status } => {
      let overviews = api.list_records(status.map(StatusArg::as_str)).await?;
      print_overviews(&overviews);
    }

    Command::Submit(args) => {
      let request = SubmissionRequest {
        student:    StudentProfile {
          control_number:   args.control_number,
          given_name:       args.given_name,
          paternal_surname: args.paternal_surname,
          maternal_surname: args.maternal_surname,
          program_id:       args.program,
          current_semester: args.current_semester,
        },
        subject_id: args.subject,
        semester:   args.semester,
        grades:     UnitGrades::new(args.unit1, args.unit2, args.unit3),
        attendance: args.attendance,
      };
      let response = api.submit(&request).await?;
      let grade = response
        .record
        .final_grade
        .map(|g| format!("{g:.2}"))
        .unwrap_or_else(|| "-".to_owned());
      println!(
        "record {} created: final grade {}, status {}",
        response.record.record_id, grade, response.record.status,
      );
    }

    Command::Withdraw { record_id, category, notes } => {
      let attachment = api.withdraw(record_id, category, notes).await?;
      println!(
        "record {record_id} withdrawn (factor {:?}, association {})",
        attachment.factor.name, attachment.association.association_id,
      );
    }

    Command::Risks { record_id } => {
      let associations = api.list_associations(record_id).await?;
      if associations.is_empty() {
        println!("no risk factors attached");
      }
      for a in associations {
        println!(
          "{}  {}  {}",
          a.association_id,
          a.severity,
          a.notes.as_deref().unwrap_or("-"),
        );
      }
    }

    Command::Attach { record_id, category, severity, notes } => {
      let attachment = api
        .attach_risk(record_id, category, severity.as_str(), notes)
        .await?;
      println!(
        "attached {:?} ({}) to record {record_id}",
        attachment.factor.name, attachment.association.severity,
      );
    }

    Command::Reconcile => {
      let overviews = api.reconciliation().await?;
      if overviews.is_empty() {
        println!("no unconfirmed withdrawals");
      } else {
        print_overviews(&overviews);
      }
    }

    Command::Student { control_number } => {
      let student = api.lookup_student(&control_number).await?;
      println!(
        "{}  {} {}, {}  semester {}",
        student.control_number,
        student.paternal_surname,
        student.maternal_surname,
        student.given_name,
        student.current_semester,
      );
    }

    Command::Programs { action } => match action {
      ProgramCmd::List => {
        for p in api.list_programs().await? {
          println!("{}  {}  {}", p.program_id, p.name, p.code.as_deref().unwrap_or("-"));
        }
      }
      ProgramCmd::Add { name, code } => {
        let program = api.add_program(&name, code).await?;
        println!("program {} created", program.program_id);
      }
      ProgramCmd::Remove { id } => {
        api.delete_program(id).await?;
        println!("program {id} deleted");
      }
    },

    Command::Subjects { action } => match action {
      SubjectCmd::List { program } => {
        for s in api.list_subjects(program).await? {
          println!(
            "{}  {}  semester {}  {}",
            s.subject_id,
            s.name,
            s.semester,
            s.code.as_deref().unwrap_or("-"),
          );
        }
      }
      SubjectCmd::Add { name, code, semester, program } => {
        let subject = api.add_subject(&name, code, semester, program).await?;
        println!("subject {} created", subject.subject_id);
      }
      SubjectCmd::Remove { id } => {
        api.delete_subject(id).await?;
        println!("subject {id} deleted");
      }
    },

    Command::Categories { action } => match action {
      CategoryCmd::List => {
        for c in api.list_categories().await? {
          println!(
            "{}  {}  {}",
            c.category_id,
            c.name,
            c.description.as_deref().unwrap_or("-"),
          );
        }
      }
      CategoryCmd::Add { name, description } => {
        let category = api.add_category(&name, description).await?;
        println!("category {} created", category.category_id);
      }
      CategoryCmd::Remove { id } => {
        api.delete_category(id).await?;
        println!("category {id} deleted");
      }
    },
  }

  Ok(())
}
