//! rxDatePicker page object.
//!
//! DOM contract, relative to the widget root:
//!
//! | Selector | Meaning |
//! |----------|---------|
//! | `.displayValue` | selected date as `YYYY-MM-DD`; click toggles the calendar |
//! | `.popup` | calendar; displayed while open |
//! | `.popup .month`, `.popup .year` | month (`MM`) and year shown by the calendar |
//! | `.popup .prev`, `.popup .next` | month navigation |
//! | `.popup .day[data-date="…"]` | day cell (`inMonth`/`outOfMonth`, `today`, `selected`) |
//! | `.popup .day.inMonth[data-date="…"] span` | clickable label of an in-month day |
//!
//! Root classes `disabled` and `ng-invalid` carry enabled and validity state.

use crate::driver::{ElementHandle, SharedDriver};
use crate::exercise::{self, ExerciseOptions};
use crate::harness::SuiteBuilder;
use crate::locator::Locator;
use crate::page_object::{ComponentHandle, PageObject};
use crate::result::{ExerciseError, ExerciseResult};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

/// Format of dates shown by the widget
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Root class of a disabled picker
pub const DISABLED_CLASS: &str = "disabled";

/// Page object for an rxDatePicker instance
#[derive(Debug, Clone)]
pub struct RxDatePicker {
    handle: ComponentHandle,
}

impl RxDatePicker {
    /// Bind to the picker rooted at `selector`
    #[must_use]
    pub fn new(driver: SharedDriver, selector: &str) -> Self {
        Self::from_handle(ComponentHandle::new(driver, Locator::new(selector)))
    }

    fn toggle(&self) -> ComponentHandle {
        self.handle.child(".displayValue")
    }

    fn popup(&self) -> ComponentHandle {
        self.handle.child(".popup")
    }

    fn day(&self, date: NaiveDate) -> ComponentHandle {
        self.handle.child(&format!(".popup .day[data-date=\"{}\"]", format_date(date)))
    }

    /// Whether the calendar is open
    pub async fn is_open(&self) -> ExerciseResult<bool> {
        self.popup().is_displayed().await
    }

    /// Open the calendar if it is closed
    pub async fn open(&self) -> ExerciseResult<()> {
        if !self.is_open().await? {
            self.toggle().click().await?;
        }
        Ok(())
    }

    /// Close the calendar if it is open
    pub async fn close(&self) -> ExerciseResult<()> {
        if self.is_open().await? {
            self.toggle().click().await?;
        }
        Ok(())
    }

    /// Currently selected date
    pub async fn date(&self) -> ExerciseResult<NaiveDate> {
        parse_date(&self.toggle().text().await?)
    }

    /// Select `date`: open the calendar, page to its month, click the day
    ///
    /// Resolves once the clicks are dispatched; read [`date`](Self::date)
    /// to confirm the selection.
    pub async fn set_date(&self, date: NaiveDate) -> ExerciseResult<()> {
        self.open().await?;

        let shown = self.shown_month().await?;
        let steps =
            (date.year() - shown.year()) * 12 + date.month0() as i32 - shown.month0() as i32;
        tracing::debug!(date = %format_date(date), steps, "setting date");

        for _ in 0..steps.unsigned_abs() {
            if steps > 0 {
                self.next_month().await?;
            } else {
                self.previous_month().await?;
            }
        }

        self.handle
            .child(&format!(
                ".popup .day.inMonth[data-date=\"{}\"] span",
                format_date(date)
            ))
            .click()
            .await
    }

    /// Month shown by the calendar, as displayed (`MM`)
    pub async fn month(&self) -> ExerciseResult<String> {
        self.handle.child(".popup .month").text().await
    }

    /// Year shown by the calendar, as displayed
    pub async fn year(&self) -> ExerciseResult<String> {
        self.handle.child(".popup .year").text().await
    }

    async fn month_number(&self) -> ExerciseResult<i32> {
        parse_number(&self.month().await?)
    }

    async fn year_number(&self) -> ExerciseResult<i32> {
        parse_number(&self.year().await?)
    }

    /// First day of the month the calendar shows
    async fn shown_month(&self) -> ExerciseResult<NaiveDate> {
        let year = self.year_number().await?;
        let month = self.month_number().await?;
        u32::try_from(month)
            .ok()
            .and_then(|month| NaiveDate::from_ymd_opt(year, month, 1))
            .ok_or_else(|| ExerciseError::InvalidValue {
                value: format!("{year}-{month:02}"),
                message: "calendar shows no representable month".to_string(),
            })
    }

    /// Page the calendar back one month
    pub async fn previous_month(&self) -> ExerciseResult<()> {
        self.handle.child(".popup .prev").click().await
    }

    /// Page the calendar forward one month
    pub async fn next_month(&self) -> ExerciseResult<()> {
        self.handle.child(".popup .next").click().await
    }

    /// Clickable day labels belonging to neighbouring months
    pub async fn out_of_month_days(&self) -> ExerciseResult<Vec<ElementHandle>> {
        let days = self.handle.child(".popup .day.outOfMonth span");
        self.handle.driver().find_all(days.locator().css()).await
    }

    /// Whether `date` is highlighted as today
    pub async fn is_date_today(&self, date: NaiveDate) -> ExerciseResult<bool> {
        self.day(date).has_class("today").await
    }

    /// Whether `date` is highlighted as the selection
    pub async fn is_date_selected(&self, date: NaiveDate) -> ExerciseResult<bool> {
        self.day(date).has_class("selected").await
    }
}

#[async_trait]
impl PageObject for RxDatePicker {
    fn component_name() -> &'static str {
        "rxDatePicker"
    }

    fn default_locator() -> Locator {
        Locator::new("rx-date-picker")
    }

    fn from_handle(handle: ComponentHandle) -> Self {
        Self { handle }
    }

    fn handle(&self) -> &ComponentHandle {
        &self.handle
    }

    async fn is_enabled(&self) -> ExerciseResult<bool> {
        Ok(!self.handle.has_class(DISABLED_CLASS).await?)
    }
}

/// Format a date the way the widget displays it
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(text: &str) -> ExerciseResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| ExerciseError::InvalidValue {
        value: text.to_string(),
        message: e.to_string(),
    })
}

fn parse_number(text: &str) -> ExerciseResult<i32> {
    text.parse().map_err(|e: std::num::ParseIntError| ExerciseError::InvalidValue {
        value: text.to_string(),
        message: e.to_string(),
    })
}

/// rxDatePicker exercises
///
/// ```ignore
/// suite.describe("default exercises", date_picker::exercise(
///     ExerciseOptions::new().instance(page.datepicker()).is_valid(false),
/// ));
/// ```
pub fn exercise(
    options: ExerciseOptions<RxDatePicker>,
) -> impl Fn(&mut SuiteBuilder) + Send + Sync + 'static {
    exercise::exercise(options)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::components::mock::MockDatePicker;
    use crate::driver::MockDriver;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn mounted(selected: NaiveDate) -> (Arc<MockDriver>, RxDatePicker) {
        let driver = Arc::new(MockDriver::new());
        MockDatePicker::new("#dpSimple", selected)
            .today(selected)
            .mount(&driver);
        let picker = RxDatePicker::new(driver.clone(), "#dpSimple");
        (driver, picker)
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_date("2016-02-29").unwrap(), date(2016, 2, 29));
        assert!(matches!(
            parse_date("Feb 29"),
            Err(ExerciseError::InvalidValue { .. })
        ));
        assert_eq!(parse_number("07").unwrap(), 7);
        assert!(parse_number("July").is_err());
    }

    #[tokio::test]
    async fn test_reads_selected_date() {
        let (_, picker) = mounted(date(2016, 5, 4));
        assert_eq!(picker.date().await.unwrap(), date(2016, 5, 4));
        assert!(picker.is_date_today(date(2016, 5, 4)).await.unwrap());
        assert!(picker.is_date_selected(date(2016, 5, 4)).await.unwrap());
        assert!(!picker.is_date_selected(date(2016, 5, 5)).await.unwrap());
    }

    #[tokio::test]
    async fn test_open_and_close() {
        let (_, picker) = mounted(date(2016, 5, 4));
        assert!(!picker.is_open().await.unwrap());
        picker.open().await.unwrap();
        assert!(picker.is_open().await.unwrap());
        picker.open().await.unwrap();
        assert!(picker.is_open().await.unwrap());
        picker.close().await.unwrap();
        assert!(!picker.is_open().await.unwrap());
    }

    #[tokio::test]
    async fn test_month_navigation_is_kept_when_reopened() {
        let (_, picker) = mounted(date(2016, 12, 4));
        picker.open().await.unwrap();
        picker.next_month().await.unwrap();
        picker.close().await.unwrap();
        picker.open().await.unwrap();
        assert_eq!(picker.month().await.unwrap(), "01");
        assert_eq!(picker.year().await.unwrap(), "2017");
    }

    #[tokio::test]
    async fn test_set_date_across_months() {
        let (driver, picker) = mounted(date(2016, 5, 4));
        picker.set_date(date(2016, 7, 31)).await.unwrap();
        assert_eq!(picker.date().await.unwrap(), date(2016, 7, 31));
        assert_eq!(
            driver
                .history()
                .iter()
                .filter(|c| c.as_str() == "click:#dpSimple .popup .next")
                .count(),
            2
        );

        picker.set_date(date(2015, 12, 1)).await.unwrap();
        assert_eq!(picker.date().await.unwrap(), date(2015, 12, 1));
    }

    #[tokio::test]
    async fn test_set_date_within_month() {
        let (_, picker) = mounted(date(2016, 5, 4));
        picker.set_date(date(2016, 5, 31)).await.unwrap();
        assert_eq!(picker.date().await.unwrap(), date(2016, 5, 31));
        assert!(picker.is_date_selected(date(2016, 5, 31)).await.unwrap());
        assert!(!picker.is_date_selected(date(2016, 5, 4)).await.unwrap());
    }

    #[tokio::test]
    async fn test_out_of_month_day_does_not_select() {
        let (_, picker) = mounted(date(2016, 5, 4));
        picker.open().await.unwrap();
        let days = picker.out_of_month_days().await.unwrap();
        assert!(!days.is_empty());

        picker
            .handle()
            .child(".popup .day.outOfMonth span")
            .click()
            .await
            .unwrap();
        assert_eq!(picker.date().await.unwrap(), date(2016, 5, 4));
    }

    #[tokio::test]
    async fn test_state_queries() {
        let driver = Arc::new(MockDriver::new());
        MockDatePicker::new("#dpDisabledInvalid", date(2016, 1, 1))
            .disabled()
            .invalid()
            .mount(&driver);
        let picker = RxDatePicker::new(driver, "#dpDisabledInvalid");
        assert!(picker.is_present().await.unwrap());
        assert!(!picker.is_enabled().await.unwrap());
        assert!(!picker.is_valid().await.unwrap());
    }

    #[tokio::test]
    async fn test_disabled_picker_does_not_open() {
        let driver = Arc::new(MockDriver::new());
        MockDatePicker::new("#dp", date(2016, 1, 1))
            .disabled()
            .mount(&driver);
        let picker = RxDatePicker::new(driver, "#dp");
        picker.open().await.unwrap();
        assert!(!picker.is_open().await.unwrap());
    }

    #[tokio::test]
    async fn test_disabled_picker_keeps_its_date() {
        let driver = Arc::new(MockDriver::new());
        MockDatePicker::new("#dp", date(2016, 5, 4))
            .disabled()
            .mount(&driver);
        let picker = RxDatePicker::new(driver, "#dp");

        picker.set_date(date(2016, 5, 20)).await.unwrap();
        assert_eq!(picker.date().await.unwrap(), date(2016, 5, 4));

        let result = picker.set_date(date(2016, 7, 31)).await;
        assert!(matches!(result, Err(ExerciseError::ElementNotFound { .. })));
        assert_eq!(picker.date().await.unwrap(), date(2016, 5, 4));
        assert_eq!(picker.month().await.unwrap(), "05");
    }

    #[tokio::test]
    async fn test_set_date_rejects_unrepresentable_year() {
        let (driver, picker) = mounted(date(2016, 5, 4));
        driver.update(|dom| dom.set_text("#dpSimple .popup .year", "999999999"));

        let result = picker.set_date(date(2016, 7, 31)).await;
        assert!(matches!(result, Err(ExerciseError::InvalidValue { .. })));
        assert_eq!(picker.date().await.unwrap(), date(2016, 5, 4));
    }
}
