use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use stress_predictor::report::{self, ReportEntry};
use stress_predictor::session::{Page, Session};
use stress_predictor::survey::{self, Slider, SurveyAnswers};
use stress_predictor::{explain, ModelPaths, Predictor, RelationshipStatus};

#[derive(Parser)]
#[command(name = "stress-predictor")]
#[command(about = "Predict student stress levels and explain the contributing factors", long_about = None)]
struct Cli {
    /// Classifier artifact (falls back to STRESS_MODEL_PATH)
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    /// Label encoder artifact (falls back to STRESS_ENCODER_PATH)
    #[arg(long, global = true)]
    encoder: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List contributing factors without running the model
    Explain {
        #[command(flatten)]
        answers: AnswerArgs,
        #[arg(long)]
        json: bool,
    },
    /// Predict the stress level for one survey
    Predict {
        #[command(flatten)]
        answers: AnswerArgs,
        #[arg(long)]
        json: bool,
        /// Also write a markdown report
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Predict every survey in a CSV file and write a markdown report
    Batch {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Fill in the survey from the terminal
    Interactive,
}

#[derive(Args)]
struct AnswerArgs {
    #[arg(long, default_value_t = survey::STUDY_HOURS.default)]
    study_hours: i64,
    #[arg(long, default_value_t = survey::ATTENDANCE.default)]
    attendance: i64,
    #[arg(long, default_value_t = survey::ASSIGNMENT_LOAD.default)]
    assignment_load: i64,
    #[arg(long, default_value_t = survey::SLEEP_HOURS.default)]
    sleep_hours: i64,
    #[arg(long, default_value_t = survey::SCREEN_TIME.default)]
    screen_time: i64,
    #[arg(long, default_value_t = survey::PHYSICAL_ACTIVITY.default)]
    physical_activity: i64,
    #[arg(long, default_value_t = survey::SOCIAL_INTERACTION.default)]
    social_interaction: i64,
    /// 0=Single, 1=Situationship, 2=Committed, 3=Casual
    #[arg(long, default_value_t = 0)]
    relationship_status: i64,
    #[arg(long, default_value_t = survey::RELATIONSHIP_SATISFACTION.default)]
    relationship_satisfaction: i64,
    #[arg(long)]
    alcohol: bool,
    #[arg(long)]
    smoking: bool,
    #[arg(long)]
    weed: bool,
    /// 1=Occasional, 2=Frequent
    #[arg(long)]
    substance_frequency: Option<i64>,
}

impl From<AnswerArgs> for SurveyAnswers {
    fn from(args: AnswerArgs) -> Self {
        SurveyAnswers {
            study_hours: args.study_hours,
            attendance: args.attendance,
            assignment_load: args.assignment_load,
            sleep_hours: args.sleep_hours,
            screen_time: args.screen_time,
            physical_activity: args.physical_activity,
            social_interaction: args.social_interaction,
            relationship_status: args.relationship_status,
            relationship_satisfaction: args.relationship_satisfaction,
            alcohol_use: args.alcohol,
            smoking_use: args.smoking,
            weed_use: args.weed,
            substance_frequency: args.substance_frequency,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = ModelPaths::resolve(cli.model, cli.encoder);

    match cli.command {
        Commands::Explain { answers, json } => {
            let record = SurveyAnswers::from(answers).build()?;
            let reasons = explain(&record);

            if json {
                println!("{}", serde_json::to_string_pretty(&reasons)?);
            } else if reasons.is_empty() {
                println!("{}", report::NO_FACTORS);
            } else {
                for reason in &reasons {
                    println!("- {reason}");
                }
            }
        }
        Commands::Predict { answers, json, out } => {
            let record = SurveyAnswers::from(answers).build()?;
            let predictor = load_predictor(&paths)?;
            let request_id = Uuid::new_v4();
            let entry = ReportEntry::new(request_id, predictor.predict_request(request_id, &record)?);
            info!(request_id = %entry.request_id, label = %entry.result.label, "prediction ready");

            if json {
                println!("{}", serde_json::to_string_pretty(&entry.result)?);
            } else {
                print!("{}", report::render_result(&entry.result));
            }

            if let Some(out) = out {
                std::fs::write(&out, report::build_report(&entry, Utc::now()))
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Report written to {}.", out.display());
            }
        }
        Commands::Batch { csv, out } => {
            let file = std::fs::File::open(&csv)
                .with_context(|| format!("failed to open {}", csv.display()))?;
            let records = survey::read_csv(file)?;
            let predictor = load_predictor(&paths)?;

            let mut entries = Vec::with_capacity(records.len());
            for record in &records {
                let request_id = Uuid::new_v4();
                entries.push(ReportEntry::new(request_id, predictor.predict_request(request_id, record)?));
            }
            info!(surveys = entries.len(), "batch scored");

            let source = csv.display().to_string();
            std::fs::write(&out, report::build_batch_report(&source, &entries, Utc::now()))
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Scored {} surveys from {}.", entries.len(), source);
            println!("Report written to {}.", out.display());
        }
        Commands::Interactive => {
            let predictor = load_predictor(&paths)?;
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            run_interactive(&predictor, &mut stdin.lock(), &mut stdout.lock())?;
        }
    }

    Ok(())
}

fn load_predictor(paths: &ModelPaths) -> anyhow::Result<Predictor> {
    Predictor::load(paths).context(
        "model files not found; set --model/--encoder or STRESS_MODEL_PATH/STRESS_ENCODER_PATH",
    )
}

fn run_interactive(
    predictor: &Predictor,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    let mut session = Session::new(predictor);

    loop {
        match session.page() {
            Page::CollectingInput => {
                writeln!(output, "Student Stress Predictor")?;
                writeln!(output, "Press enter to keep the value in brackets.")?;
                let Some(answers) = collect_answers(input, output)? else {
                    return Ok(());
                };
                session.submit(&answers)?;
            }
            Page::ShowingResult { request_id, result } => {
                writeln!(output)?;
                writeln!(output, "Request {request_id}")?;
                write!(output, "{}", report::render_result(result))?;
                writeln!(output)?;
                match read_line(input, output, "[n]ew prediction or [q]uit")? {
                    Some(answer) if answer.eq_ignore_ascii_case("n") => session.reset(),
                    _ => return Ok(()),
                }
            }
        }
    }
}

// Returns None once input runs out.
fn collect_answers(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<Option<SurveyAnswers>> {
    let mut answers = SurveyAnswers::default();

    writeln!(output, "\nAcademics")?;
    let Some(value) = ask_slider(input, output, &survey::STUDY_HOURS)? else { return Ok(None) };
    answers.study_hours = value;
    let Some(value) = ask_slider(input, output, &survey::ATTENDANCE)? else { return Ok(None) };
    answers.attendance = value;
    let Some(value) = ask_slider(input, output, &survey::ASSIGNMENT_LOAD)? else { return Ok(None) };
    answers.assignment_load = value;

    writeln!(output, "\nLifestyle")?;
    let Some(value) = ask_slider(input, output, &survey::SLEEP_HOURS)? else { return Ok(None) };
    answers.sleep_hours = value;
    let Some(value) = ask_slider(input, output, &survey::SCREEN_TIME)? else { return Ok(None) };
    answers.screen_time = value;
    let Some(value) = ask_slider(input, output, &survey::PHYSICAL_ACTIVITY)? else { return Ok(None) };
    answers.physical_activity = value;
    let Some(value) = ask_slider(input, output, &survey::SOCIAL_INTERACTION)? else { return Ok(None) };
    answers.social_interaction = value;

    writeln!(output, "\nRelationships")?;
    for status in RelationshipStatus::ALL {
        writeln!(output, "  {} = {}", status.code(), status.display_name())?;
    }
    let status_choice = Slider {
        field: "relationship_status",
        label: "Relationship Status",
        min: 0,
        max: 3,
        default: 0,
    };
    let Some(value) = ask_slider(input, output, &status_choice)? else { return Ok(None) };
    answers.relationship_status = value;
    if value != 0 {
        let Some(value) = ask_slider(input, output, &survey::RELATIONSHIP_SATISFACTION)? else {
            return Ok(None);
        };
        answers.relationship_satisfaction = value;
    }

    writeln!(output, "\nSubstance Usage")?;
    let Some(value) = ask_yes_no(input, output, "Alcohol")? else { return Ok(None) };
    answers.alcohol_use = value;
    let Some(value) = ask_yes_no(input, output, "Smoking")? else { return Ok(None) };
    answers.smoking_use = value;
    let Some(value) = ask_yes_no(input, output, "Weed")? else { return Ok(None) };
    answers.weed_use = value;

    if answers.alcohol_use || answers.smoking_use || answers.weed_use {
        let frequency = Slider {
            field: "substance_frequency",
            label: "Usage Frequency (1=Occasional, 2=Frequent)",
            min: 1,
            max: 2,
            default: 1,
        };
        let Some(value) = ask_slider(input, output, &frequency)? else { return Ok(None) };
        answers.substance_frequency = Some(value);
    }

    Ok(Some(answers))
}

fn ask_slider(
    input: &mut impl BufRead,
    output: &mut impl Write,
    slider: &Slider,
) -> anyhow::Result<Option<i64>> {
    let prompt = format!("{} {}-{} [{}]", slider.label, slider.min, slider.max, slider.default);
    loop {
        let Some(answer) = read_line(input, output, &prompt)? else { return Ok(None) };
        if answer.is_empty() {
            return Ok(Some(slider.default));
        }
        match answer.parse::<i64>() {
            Ok(value) if slider.check(value).is_ok() => return Ok(Some(value)),
            _ => writeln!(output, "Enter a whole number from {} to {}.", slider.min, slider.max)?,
        }
    }
}

fn ask_yes_no(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
) -> anyhow::Result<Option<bool>> {
    let prompt = format!("{label} (y/N)");
    loop {
        let Some(answer) = read_line(input, output, &prompt)? else { return Ok(None) };
        match answer.to_ascii_lowercase().as_str() {
            "" | "n" | "no" => return Ok(Some(false)),
            "y" | "yes" => return Ok(Some(true)),
            _ => writeln!(output, "Answer y or n.")?,
        }
    }
}

fn read_line(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
) -> anyhow::Result<Option<String>> {
    write!(output, "{prompt}: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).context("failed to read input")? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use stress_predictor::{LabelEncoder, TreeEnsemble};

    fn demo_predictor() -> Predictor {
        Predictor::new(
            TreeEnsemble::from_json(include_str!("../demos/stress_model.json")).unwrap(),
            LabelEncoder::from_json(include_str!("../demos/label_encoder.json")).unwrap(),
        )
    }

    // Seven sliders, relationship status, three substance questions.
    const DEFAULT_FORM: &str = "\n\n\n\n\n\n\n\n\n\n\n";

    fn run(script: &str) -> String {
        let predictor = demo_predictor();
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        run_interactive(&predictor, &mut input, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn blank_answers_take_form_defaults() {
        let output = run(&format!("{DEFAULT_FORM}q\n"));
        assert!(output.contains("Study Hours (Daily) 0-12 [5]: "));
        assert!(output.contains("Predicted Stress Level: Low (green)"));
        assert!(output.contains(report::NO_FACTORS));
    }

    #[test]
    fn out_of_range_answer_asks_again() {
        let output = run("13\n8\n\n\n\n\n\n\n\n\n\n\nq\n");
        assert_eq!(output.matches("Study Hours (Daily) 0-12 [5]: ").count(), 2);
        assert!(output.contains("Enter a whole number from 0 to 12."));
        assert!(output.contains("- High study workload (>7 hrs/day)"));
    }

    #[test]
    fn new_prediction_restarts_the_form() {
        // Second form: stressed student in an unhappy committed relationship.
        let second = "8\n70\n4\n5\n7\n1\n2\n2\n2\nn\nn\nn\n";
        let output = run(&format!("{DEFAULT_FORM}n\n{second}q\n"));
        assert_eq!(output.matches("Student Stress Predictor").count(), 2);
        assert_eq!(output.matches("Predicted Stress Level:").count(), 2);
        assert!(output.contains("Predicted Stress Level: High (red)"));
        assert!(output.contains("- Low satisfaction in committed relationship"));
    }

    #[test]
    fn end_of_input_mid_form_exits_cleanly() {
        let output = run("5\n90\n");
        assert!(output.contains("Assignment Load (1-5) 1-5 [3]: "));
        assert!(!output.contains("Predicted Stress Level"));
    }

    #[test]
    fn substance_frequency_is_asked_only_when_ticked() {
        let output = run("\n\n\n\n\n\n\n\ny\n\n\n2\nq\n");
        assert_eq!(output.matches("Usage Frequency").count(), 1);
        assert!(output.contains("- Frequent substance use"));
    }
}
