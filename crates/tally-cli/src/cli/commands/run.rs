use super::providers::build_evaluator;
use super::RunArgs;
use crate::exit_codes;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tally_core::config::load_config;
use tally_core::dataset::load_items;
use tally_core::providers::backend::ImageInput;
use tally_core::report::json::write_json;
use tally_core::report::{ItemOutcome, RunArtifacts};
use tally_core::TrialBatch;
use tracing::{error, info};

pub fn run(args: RunArgs) -> anyhow::Result<i32> {
    let mut cfg = match load_config(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    if let Some(trials) = args.trials {
        cfg.trials = trials;
    }
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(format) = args.choice_format {
        cfg.evaluator = cfg.evaluator.with_choice_format(format);
    }
    if let Some(order) = args.match_order {
        cfg.evaluator = cfg.evaluator.with_match_order(order);
    }
    if args.no_cache {
        cfg.evaluator.cache_path = None;
    }
    if let Some(dir) = args.cache_dir {
        cfg.evaluator.cache_path = Some(dir);
    }
    if let Err(e) = cfg.validate() {
        eprintln!("{e}");
        return Ok(exit_codes::CONFIG_ERROR);
    }

    let items = match load_items(&args.items) {
        Ok(items) => items,
        Err(e) => {
            eprintln!("{e:#}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let evaluator = match build_evaluator(&cfg) {
        Ok(ev) => ev,
        Err(e) => {
            eprintln!("ConfigError: {e:#}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        items = items.len(),
        trials = cfg.trials,
        model = %cfg.evaluator.model,
        "starting run"
    );

    let mut outcomes = Vec::with_capacity(items.len());
    for item in &items {
        let data = ImageInput::new(&item.image);
        let answer = item.answer.as_deref();
        let result = if cfg.trials == 1 {
            evaluator
                .multiple_choice_qa(&data, &item.question, &item.choices, None, answer)
                .map(TrialBatch::single)
        } else {
            evaluator.multiple_choice_qa_random_ordering(
                &data,
                &item.question,
                &item.choices,
                None,
                answer,
                cfg.trials,
                &mut rng,
            )
        };

        match result {
            Ok(batch) => {
                info!(item = %item.id, accuracy = ?batch.accuracy, "item evaluated");
                outcomes.push(ItemOutcome {
                    id: item.id.clone(),
                    result: batch,
                });
            }
            Err(e) if e.is_config() => {
                eprintln!("item '{}': {e}", item.id);
                return Ok(exit_codes::CONFIG_ERROR);
            }
            Err(e) => {
                error!(item = %item.id, error = %e, "evaluation failed");
                eprintln!("item '{}': {e}", item.id);
                return Ok(exit_codes::RUN_FAILED);
            }
        }
    }

    let artifacts = RunArtifacts::new(cfg.evaluator.model.clone(), outcomes, cfg.trials);
    write_json(&artifacts, &args.out)?;

    println!("{}", artifacts.summary.render_console());
    println!("results: {}", args.out.display());
    Ok(exit_codes::SUCCESS)
}
