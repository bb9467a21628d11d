use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::{InputRecord, ProjectionView};
use crate::session::{Session, SessionError};
use crate::store::FileStore;

#[derive(Parser, Debug)]
#[command(
    name = "retire",
    about = "Retirement savings projection at 15% a year with 0.6% monthly passive income"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "RETIRE_STORE_DIR",
        default_value = ".",
        help = "Directory holding the saved form values"
    )]
    pub store_dir: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project savings and save the form values
    Project {
        #[command(flatten)]
        form: FormArgs,
        #[arg(long, help = "Print the full result as JSON")]
        json: bool,
    },
    /// Save the form values without projecting
    Save {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Print the saved form values
    Show,
    /// Erase the saved form values
    Clear,
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

/// Raw form fields. Omitted fields keep their saved values.
#[derive(Args, Debug, Default, Clone)]
pub struct FormArgs {
    #[arg(long, help = "Current age in years")]
    pub age_now: Option<String>,
    #[arg(long, help = "Retirement age in years")]
    pub age_retire: Option<String>,
    #[arg(long, help = "Current savings, e.g. \"R$ 10.000,00\"")]
    pub pv: Option<String>,
    #[arg(long, help = "Monthly contribution paid at the end of each month")]
    pub pmt: Option<String>,
    #[arg(long, help = "Desired monthly passive income; empty or 0 for no goal")]
    pub income_goal: Option<String>,
}

impl FormArgs {
    fn merge_into(self, mut record: InputRecord) -> InputRecord {
        let fields = [
            (self.age_now, &mut record.age_now),
            (self.age_retire, &mut record.age_retire),
            (self.pv, &mut record.pv),
            (self.pmt, &mut record.pmt),
            (self.income_goal, &mut record.income_goal),
        ];
        for (arg, field) in fields {
            if let Some(value) = arg {
                *field = value;
            }
        }
        record
    }
}

pub async fn run(cli: Cli) -> Result<(), String> {
    let store = FileStore::in_dir(&cli.store_dir);
    log::debug!("using store at {}", store.path().display());

    let outcome = match cli.command {
        Command::Serve { port } => {
            return crate::api::run_http_server(port, store)
                .await
                .map_err(|e| format!("Server error: {e}"));
        }
        Command::Project { form, json } => project(Session::new(store), form, json),
        Command::Save { form } => save(Session::new(store), form),
        Command::Show => {
            show(&Session::new(store));
            Ok(())
        }
        Command::Clear => clear(Session::new(store)),
    };
    outcome.map_err(|e| e.to_string())
}

fn project(mut session: Session<FileStore>, form: FormArgs, json: bool) -> Result<(), SessionError> {
    let record = form.merge_into(session.restore());
    let projection = session.compute(record)?;
    if json {
        println!("{}", projection.to_json()?);
    } else {
        print!("{}", render_text(&projection.view));
    }
    Ok(())
}

fn save(mut session: Session<FileStore>, form: FormArgs) -> Result<(), SessionError> {
    let record = form.merge_into(session.restore());
    session.save(&record)?;
    println!("Dados salvos neste aparelho.");
    Ok(())
}

fn show(session: &Session<FileStore>) {
    let record = session.restore();
    if record.is_empty() {
        println!("Nenhum dado salvo.");
    } else {
        print!("{}", render_record(&record));
    }
}

fn clear(mut session: Session<FileStore>) -> Result<(), SessionError> {
    session.clear()?;
    println!("Dados apagados.");
    Ok(())
}

fn render_text(view: &ProjectionView) -> String {
    let mut out = String::new();
    for (label, value) in [
        ("Meses", &view.months),
        ("Horizonte", &view.years),
        ("Patrimônio projetado", &view.future_value),
        ("Renda passiva", &view.passive_income),
        ("Aporte necessário", &view.required_contribution),
        ("Meta", &view.goal),
    ] {
        out.push_str(&format!("{label:<22} {value}\n"));
    }
    out.push('\n');
    for tip in &view.tips {
        out.push_str(&format!("Sugestão: {tip}\n"));
    }
    out
}

fn render_record(record: &InputRecord) -> String {
    [
        ("age_now", &record.age_now),
        ("age_retire", &record.age_retire),
        ("pv", &record.pv),
        ("pmt", &record.pmt),
        ("income_goal", &record.income_goal),
    ]
    .iter()
    .map(|(key, value)| format!("{key:<12} {value}\n"))
    .collect()
}
