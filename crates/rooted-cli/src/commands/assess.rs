use chrono::Utc;
use clap::Subcommand;
use rooted_core::assessment::{
    classify_burnout, classify_stress, compute_burnout_scores, compute_stress_score,
    find_question, mentor_feedback, AnswerSet, AssessmentResults, Question, Response,
    BURNOUT_QUESTIONS, STRESS_QUESTIONS,
};
use rooted_core::ProfileStore;

use super::{load_config, open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum AssessAction {
    /// List both questionnaires
    Questions {
        #[arg(long)]
        json: bool,
    },
    /// Score a set of answers
    Score {
        /// Burnout answer as id=level (0-4 or Never..Always), repeatable
        #[arg(long = "burnout", value_name = "ID=LEVEL")]
        burnout: Vec<String>,
        /// Stress answer as id=level, repeatable
        #[arg(long = "stress", value_name = "ID=LEVEL")]
        stress: Vec<String>,
        /// Store the results on the profile
        #[arg(long)]
        save: bool,
        #[arg(long)]
        json: bool,
    },
}

fn parse_answers(pairs: &[String], catalog: &[Question]) -> Result<AnswerSet, String> {
    let mut answers = AnswerSet::new();
    for pair in pairs {
        let (id, level) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected id=level, got '{pair}'"))?;
        let id = id.trim();
        if !catalog.iter().any(|q| q.id == id) {
            return match find_question(id) {
                Some(_) => Err(format!("question '{id}' belongs to the other questionnaire")),
                None => Err(format!("unknown question '{id}'")),
            };
        }
        let response: Response = level
            .parse()
            .map_err(|e: rooted_core::ValidationError| e.to_string())?;
        answers.answer(id, response);
    }
    Ok(answers)
}

fn print_catalog(title: &str, catalog: &[Question]) {
    println!("{title}");
    for q in catalog {
        let tag = q.category.map(|c| format!(" [{c}]")).unwrap_or_default();
        let rev = if q.reverse { " (reversed)" } else { "" };
        println!("  {:<12} {}{tag}{rev}", q.id, q.prompt);
    }
}

pub fn run(action: AssessAction) -> CliResult {
    match action {
        AssessAction::Questions { json } => {
            if json {
                print_json(&serde_json::json!({
                    "burnout": BURNOUT_QUESTIONS,
                    "stress": STRESS_QUESTIONS,
                }))?;
            } else {
                print_catalog("Burnout", &BURNOUT_QUESTIONS);
                println!();
                print_catalog("Stress", &STRESS_QUESTIONS);
                println!();
                println!("Levels: 0 Never, 1 Rarely, 2 Sometimes, 3 Often, 4 Always");
            }
        }
        AssessAction::Score {
            burnout,
            stress,
            save,
            json,
        } => {
            let config = load_config()?;
            let burnout_answers = parse_answers(&burnout, &BURNOUT_QUESTIONS)?;
            let stress_answers = parse_answers(&stress, &STRESS_QUESTIONS)?;
            let results = AssessmentResults {
                burnout: compute_burnout_scores(&burnout_answers, &BURNOUT_QUESTIONS),
                stress: compute_stress_score(
                    &stress_answers,
                    &STRESS_QUESTIONS,
                    config.stress_scoring(),
                ),
                completed_at: Utc::now(),
            };

            let store = open_store()?;
            let profiles = ProfileStore::new(&store);
            let profile = if save {
                Some(profiles.update(|p| {
                    p.assessment_results = Some(results.clone());
                    Ok::<_, rooted_core::CoreError>(())
                })?)
            } else {
                profiles.load()?
            };
            let mentor = profile.and_then(|p| p.mentor);

            if json {
                print_json(&results)?;
            } else {
                for (category, score) in results.burnout.iter() {
                    let class = classify_burnout(score);
                    println!("{category:<10} {score:>3}%  {:?}: {}", class.level, class.description);
                }
                let class = classify_stress(results.stress);
                println!("{:<10} {:>3}%  {:?}: {}", "Stress", results.stress, class.level, class.description);
                println!();
                println!("{}", mentor_feedback(mentor.as_ref(), &results.burnout, results.stress));
                if save {
                    println!("saved to profile");
                }
            }
        }
    }
    Ok(())
}
