//! Simulated widgets for [`MockDriver`].
//!
//! Each builder mounts the elements a widget renders, following the DOM
//! contract its page object expects, and registers click reactions so the
//! simulated widget changes state the way the real one does.

use super::date_picker::format_date;
use super::search_box::INPUT_SELECTOR;
use crate::driver::{MockDom, MockDriver, MockElement};
use crate::page_object::INVALID_CLASS;
use chrono::{Datelike, Days, NaiveDate};

/// Days of the previous month rendered ahead of the 1st
const LEADING_DAYS: u64 = 3;

/// Simulated rxDatePicker
#[derive(Debug, Clone)]
pub struct MockDatePicker {
    root: String,
    selected: NaiveDate,
    today: NaiveDate,
    enabled: bool,
    valid: bool,
}

impl MockDatePicker {
    /// Picker at `root` with `selected` chosen (today defaults to `selected`)
    #[must_use]
    pub fn new(root: impl Into<String>, selected: NaiveDate) -> Self {
        Self {
            root: root.into(),
            selected,
            today: selected,
            enabled: true,
            valid: true,
        }
    }

    /// Set the date highlighted as today
    #[must_use]
    pub const fn today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Render disabled; every control ignores clicks
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Render with an invalid model
    #[must_use]
    pub const fn invalid(mut self) -> Self {
        self.valid = false;
        self
    }

    /// Insert the picker into `driver`'s document
    pub fn mount(self, driver: &MockDriver) {
        let root = self.root;
        let toggle = format!("{root} .displayValue");
        let popup = format!("{root} .popup");

        let mut root_element = MockElement::new(root.as_str()).tag("rx-date-picker");
        root_element = root_element.class(if self.valid { "ng-valid" } else { INVALID_CLASS });
        if !self.enabled {
            root_element = root_element.class(super::date_picker::DISABLED_CLASS);
        }
        let enabled = self.enabled;
        let control = |element: MockElement| {
            if enabled {
                element
            } else {
                element.disabled()
            }
        };

        driver.add_element(root_element);
        driver.add_element(control(
            MockElement::new(toggle.as_str()).text(format_date(self.selected)),
        ));
        driver.add_element(MockElement::new(popup.as_str()).hidden());
        driver.add_element(control(MockElement::new(format!("{root} .popup .prev"))));
        driver.add_element(control(MockElement::new(format!("{root} .popup .next"))));
        driver.add_element(
            MockElement::new(format!("{root} .popup .month"))
                .text(format!("{:02}", self.selected.month())),
        );
        driver.add_element(
            MockElement::new(format!("{root} .popup .year")).text(self.selected.year().to_string()),
        );

        let today = self.today;
        let selected_date = self.selected;
        driver.update(|dom| {
            let shown = view(dom, &root);
            render_days(dom, &root, shown, selected_date, today, enabled);
        });

        let popup_selector = popup.clone();
        driver.on_click(toggle.as_str(), move |dom| {
            if let Some(element) = dom.element_mut(&popup_selector) {
                element.displayed = !element.displayed;
            }
        });

        for (control, delta) in [("prev", -1), ("next", 1)] {
            let root = root.clone();
            driver.on_click(format!("{root} .popup .{control}"), move |dom| {
                page(dom, &root, delta, today, enabled);
            });
        }

        let prefix = format!("{root} .popup .day.inMonth[data-date=\"");
        let matcher_prefix = prefix.clone();
        driver.on_click_where(
            move |s| s.starts_with(&matcher_prefix) && s.ends_with("\"] span"),
            move |dom, selector| {
                let Some(date) = selector
                    .strip_prefix(&prefix)
                    .and_then(|rest| rest.strip_suffix("\"] span"))
                    .and_then(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
                else {
                    return;
                };
                dom.set_text(&toggle, format_date(date));
                dom.set_displayed(&popup, false);
                let shown = view(dom, &root);
                render_days(dom, &root, shown, date, today, enabled);
            },
        );
    }
}

fn view(dom: &MockDom, root: &str) -> (i32, u32) {
    let text = |part: &str| {
        dom.element(&format!("{root} .popup .{part}"))
            .map(|e| e.text.clone())
            .unwrap_or_default()
    };
    (
        text("year").parse().unwrap_or(1970),
        text("month").parse().unwrap_or(1),
    )
}

fn selected(dom: &MockDom, root: &str) -> Option<NaiveDate> {
    dom.element(&format!("{root} .displayValue"))
        .and_then(|e| NaiveDate::parse_from_str(&e.text, "%Y-%m-%d").ok())
}

fn page(dom: &mut MockDom, root: &str, delta: i32, today: NaiveDate, enabled: bool) {
    let (year, month) = view(dom, root);
    let Some(index) = year
        .checked_mul(12)
        .and_then(|i| i.checked_add(month as i32 - 1 + delta))
    else {
        return;
    };
    let shown = (index.div_euclid(12), index.rem_euclid(12) as u32 + 1);
    dom.set_text(&format!("{root} .popup .year"), shown.0.to_string());
    dom.set_text(&format!("{root} .popup .month"), format!("{:02}", shown.1));
    if let Some(selected) = selected(dom, root) {
        render_days(dom, root, shown, selected, today, enabled);
    }
}

fn render_days(
    dom: &mut MockDom,
    root: &str,
    (year, month): (i32, u32),
    selected: NaiveDate,
    today: NaiveDate,
    enabled: bool,
) {
    let days_prefix = format!("{root} .popup .day");
    dom.remove_where(|s| s.starts_with(&days_prefix));

    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return;
    };
    let cell = |date: NaiveDate, in_month: bool| {
        let mut element = MockElement::new(format!(
            "{root} .popup .day[data-date=\"{}\"]",
            format_date(date)
        ))
        .class("day")
        .class(if in_month { "inMonth" } else { "outOfMonth" });
        if date == today {
            element = element.class("today");
        }
        if date == selected {
            element = element.class("selected");
        }
        element
    };

    let mut leading = first.checked_sub_days(Days::new(LEADING_DAYS));
    while let Some(date) = leading.filter(|d| *d < first) {
        dom.insert(cell(date, false));
        dom.insert(label(
            MockElement::new(format!("{root} .popup .day.outOfMonth span")),
            date,
            enabled,
        ));
        leading = date.succ_opt();
    }

    let mut day = Some(first);
    while let Some(date) = day.filter(|d| d.month() == month) {
        dom.insert(cell(date, true));
        dom.insert(label(
            MockElement::new(format!(
                "{root} .popup .day.inMonth[data-date=\"{}\"] span",
                format_date(date)
            )),
            date,
            enabled,
        ));
        day = date.succ_opt();
    }
}

/// Clickable day-number label inside a cell
fn label(element: MockElement, date: NaiveDate, enabled: bool) -> MockElement {
    let element = element.tag("span").text(date.day().to_string());
    if enabled {
        element
    } else {
        element.disabled()
    }
}

/// Simulated rxSearchBox
#[derive(Debug, Clone)]
pub struct MockSearchBox {
    root: String,
    placeholder: String,
    term: String,
    enabled: bool,
}

impl MockSearchBox {
    /// Search box at `root` with the default placeholder
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            placeholder: super::search_box::DEFAULT_PLACEHOLDER.to_string(),
            term: String::new(),
            enabled: true,
        }
    }

    /// Set the placeholder text
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Pre-fill the search term
    #[must_use]
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Render disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Insert the search box into `driver`'s document
    pub fn mount(self, driver: &MockDriver) {
        let mut input = MockElement::new(format!("{} {INPUT_SELECTOR}", self.root))
            .tag("input")
            .attr("placeholder", self.placeholder)
            .attr("value", self.term);
        if !self.enabled {
            input = input.disabled();
        }
        driver.add_element(MockElement::new(self.root).tag("rx-search-box"));
        driver.add_element(input);
    }
}
