//! Exercise a few date pickers mounted in the in-memory document.
//!
//! Run with: `cargo run --example date_picker_exercise`
//! Set `RUST_LOG=rx_page_objects=debug` to see every interaction.

use chrono::NaiveDate;
use rx_page_objects::components::mock::MockDatePicker;
use rx_page_objects::components::RxDatePicker;
use rx_page_objects::{
    date_picker, describe, init_tracing, ExerciseError, ExerciseOptions, ExerciseResult, MockDriver,
    SuiteRunner, TestStatus, TracingConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExerciseResult<()> {
    let _ = init_tracing(&TracingConfig::new());

    let selected = NaiveDate::from_ymd_opt(2016, 5, 4).ok_or_else(|| ExerciseError::InvalidValue {
        value: "2016-05-04".to_string(),
        message: "out of range".to_string(),
    })?;
    let driver = Arc::new(MockDriver::new());
    MockDatePicker::new("#dpSimple", selected).mount(&driver);
    MockDatePicker::new("#dpDisabled", selected)
        .disabled()
        .mount(&driver);
    MockDatePicker::new("#dpInvalid", selected)
        .invalid()
        .mount(&driver);

    let simple = RxDatePicker::new(driver.clone(), "#dpSimple");
    let disabled = RxDatePicker::new(driver.clone(), "#dpDisabled");
    let invalid = RxDatePicker::new(driver.clone(), "#dpInvalid");

    println!("=== rxDatePicker ===\n");
    println!("Selected date: {}", simple.date().await?);
    if let Some(target) = NaiveDate::from_ymd_opt(2016, 7, 31) {
        simple.set_date(target).await?;
        println!("After set_date: {}", simple.date().await?);
    }

    let suite = describe("rxDatePicker", driver, |s| {
        s.describe(
            "simple",
            date_picker::exercise(ExerciseOptions::new().instance(simple)),
        );
        s.describe(
            "disabled",
            date_picker::exercise(ExerciseOptions::new().instance(disabled).is_enabled(false)),
        );
        s.describe(
            "invalid",
            date_picker::exercise(ExerciseOptions::new().instance(invalid).is_valid(false)),
        );
    });

    let results = SuiteRunner::new().run(&suite).await;
    for result in &results.results {
        let mark = match result.status {
            TestStatus::Passed => "✓",
            TestStatus::Failed => "✗",
            TestStatus::Skipped => "-",
        };
        println!("  {mark} {}", result.name);
        if let Some(error) = &result.error {
            println!("      {error}");
        }
    }
    println!(
        "\n{} passed, {} failed",
        results.passed_count(),
        results.failed_count()
    );
    Ok(())
}
