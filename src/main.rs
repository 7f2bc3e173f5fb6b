use std::path::Path;
use std::process::ExitCode;

use deco_site_selector::api::schedule_dto::ScheduleDto;
use deco_site_selector::domain::statistics::ScheduleStatistics;
use deco_site_selector::{logger, plan_workflow};

fn main() -> ExitCode {
    logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        let program = args.first().map(String::as_str).unwrap_or("deco_site_selector");
        log::error!("Usage: {} <workflow.json> <sites.json> [config.json]", program);
        return ExitCode::FAILURE;
    }
    let config_path = args.get(3).map(Path::new);

    log::info!("Loading workflow from path: '{}'...", args[1]);
    match plan_workflow(&args[1], &args[2], config_path) {
        Ok((_, schedule)) => {
            for site in ScheduleStatistics::from_schedule(&schedule).sites {
                log::info!("Site {}: {} tasks, busy {}, utilization {:.2}", site.site, site.tasks, site.busy_time, site.utilization);
            }
            match serde_json::to_string_pretty(&ScheduleDto::from(&schedule)) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    log::error!("Failed to serialize schedule: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Planning failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
