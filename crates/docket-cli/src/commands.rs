//! Subcommand implementations, generic over the record type

use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use docket_admin::{AccountService, AccountSpec, UserAccount};
use docket_core::{Actor, RecordId, RecordService, parse_date};
use docket_forms::DrawerEvent;
use docket_records::Entity;
use docket_services::{JsonFileStore, RecordManager};
use docket_settings::DocketSettings;
use docket_table::{
    Align, ColumnDef, ColumnEntry, FilterKind, FilterSchema, FilterValue, SortOrder,
};

use crate::console::{ConsoleConfirm, ConsoleNotifier};

/// Shared state for one invocation
pub struct Context {
    pub settings: DocketSettings,
    pub actor: Actor,
    pub assume_yes: bool,
}

/// Query options for `list`
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub filters: Vec<String>,
    pub contains: Vec<String>,
    pub sort: Option<String>,
    pub descending: bool,
    pub page: usize,
    pub page_size: Option<usize>,
    pub json: bool,
}

/// Split `field=value`
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => bail!("expected FIELD=VALUE, got '{}'", raw),
    }
}

/// Parse a `--filter` argument using the kind declared for its field.
///
/// Date ranges are written `START..END`; either bound may be left out.
pub fn parse_filter(schema: &FilterSchema, raw: &str) -> Result<(String, FilterValue)> {
    let (field, value) = parse_assignment(raw)?;
    let Some(declared) = schema.get(&field) else {
        bail!("'{}' cannot be filtered", field);
    };

    let filter = match declared.kind {
        FilterKind::Text => FilterValue::text(value),
        FilterKind::DateRange => {
            let (start, end) = value.split_once("..").unwrap_or((value.as_str(), ""));
            let bound = |text: &str| -> Result<_> {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                parse_date(text)
                    .map(Some)
                    .with_context(|| format!("'{}' is not a date (YYYY-MM-DD)", text))
            };
            FilterValue::range(bound(start)?, bound(end)?)
        }
    };
    Ok((field, filter))
}

/// One label per leaf column; grouped leaves are prefixed by their group
pub fn header_labels<R>(entries: &[ColumnEntry<R>]) -> Vec<(String, Align)> {
    let mut labels = Vec::new();
    for entry in entries {
        match entry {
            ColumnEntry::Leaf(column) => labels.push((column.label.clone(), column.align)),
            ColumnEntry::Group(group) => labels.extend(
                group
                    .children
                    .iter()
                    .map(|child| (format!("{}\n{}", group.title, child.label), child.align)),
            ),
        }
    }
    labels
}

fn cell_alignment(align: Align) -> CellAlignment {
    match align {
        Align::Left => CellAlignment::Left,
        Align::Center => CellAlignment::Center,
        Align::Right => CellAlignment::Right,
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

async fn open_manager<E: Entity>(ctx: &Context) -> Result<RecordManager<E>> {
    let path = ctx.settings.collection_path(E::PLURAL)?;
    let mut store = JsonFileStore::<E>::open(&path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    if let Some(field) = E::unique_field() {
        store = store.with_unique_field(field);
    }

    let table = E::table(ctx.settings.table.effective_page_size())?
        .with_default_order(ctx.settings.table.default_sort_order);

    let mut manager = RecordManager::new(Arc::new(store), table, E::drawer()?)
        .with_actor(ctx.actor.clone())
        .with_confirm(Arc::new(ConsoleConfirm::new(ctx.assume_yes)))
        .with_notifier(Arc::new(ConsoleNotifier));
    manager.refresh().await?;
    Ok(manager)
}

pub async fn list<E: Entity>(ctx: &Context, options: &ListOptions) -> Result<()> {
    let mut manager = open_manager::<E>(ctx).await?;

    let table = manager.table_mut();
    if let Some(term) = &options.search {
        table.set_search(term.as_str());
    }
    for raw in &options.filters {
        let (field, value) = parse_filter(table.filter_schema(), raw)?;
        table.set_filter(&field, value)?;
    }
    for field in &options.contains {
        table.set_exact_match(field, false);
    }
    if let Some(key) = &options.sort {
        let wanted = if options.descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        if table.toggle_sort(key)?.order != wanted {
            table.toggle_sort(key)?;
        }
    }
    if let Some(size) = options.page_size {
        table.set_page_size(size);
    }
    table.go_to_page(options.page.max(1));

    let labels = header_labels(table.columns());
    let leaves: Vec<ColumnDef<E>> = table.leaf_columns().into_iter().cloned().collect();
    let actions: Vec<&str> = manager.row_actions().iter().map(|a| a.label()).collect();

    let view = manager.view();
    let shown = view.rows.len();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&view.rows)?);
        return Ok(());
    }

    let mut output = new_table();
    let mut header = vec![Cell::new("ID")];
    header.extend(
        labels
            .iter()
            .map(|(label, align)| Cell::new(label).set_alignment(cell_alignment(*align))),
    );
    output.set_header(header);
    for record in &view.rows {
        let mut row = vec![Cell::new(record.id())];
        row.extend(
            leaves
                .iter()
                .map(|column| Cell::new(column.render(record)).set_alignment(cell_alignment(column.align))),
        );
        output.add_row(row);
    }
    println!("{output}");

    println!("{}", manager.table().pagination().status_text(shown));
    if !actions.is_empty() {
        println!("Row actions: {}", actions.join(", "));
    }
    Ok(())
}

/// Print the header layout of a record type
pub fn columns<E: Entity>() -> Result<()> {
    let table = E::table(1)?;
    let mut output = new_table();
    output.set_header(vec!["Row", "Label", "Columns", "Rows", "Align", "Sort key"]);
    for (index, row) in table.header_rows().iter().enumerate() {
        for cell in row {
            output.add_row(vec![
                Cell::new(index + 1),
                Cell::new(&cell.label),
                Cell::new(cell.col_span),
                Cell::new(cell.row_span),
                Cell::new(format!("{:?}", cell.align)),
                Cell::new(cell.sort_key.as_deref().unwrap_or("")),
            ]);
        }
    }
    println!("{output}");
    Ok(())
}

/// Fill the open drawer, move to review and submit
async fn fill_and_submit<E: Entity>(manager: &mut RecordManager<E>, assignments: &[String]) -> Result<()> {
    let drawer = manager.drawer_mut();
    for raw in assignments {
        let (field, value) = parse_assignment(raw)?;
        if drawer.schema().get(&field).is_none() {
            bail!("{} has no field '{}'", E::TITLE, field);
        }
        drawer.set_field(&field, value);
    }

    if !drawer.next() {
        for (field, message) in drawer.errors().iter() {
            eprintln!("  {}: {}", field, message);
        }
        bail!("{} form has errors", E::TITLE);
    }

    let mut review = new_table();
    for (label, value) in drawer.review_rows() {
        review.add_row(vec![label, value]);
    }
    println!("{review}");

    let event = manager.submit().await?;
    println!("{}", submission_outcome(event)?);
    Ok(())
}

/// Line to print once a submission settles. The notifier has already shown
/// a service failure, so the error only summarizes it.
fn submission_outcome<E: Entity>(event: DrawerEvent<E>) -> Result<String> {
    let noun = E::TITLE.to_lowercase();
    match event {
        DrawerEvent::Created(record) => Ok(format!("Created {} {}", noun, record.id())),
        DrawerEvent::Updated(record) => Ok(format!("Updated {} {}", noun, record.id())),
        DrawerEvent::Declined => Ok("Cancelled".to_string()),
        DrawerEvent::Failed(_) => bail!("{} was not saved", noun),
        DrawerEvent::Discarded => bail!("the response arrived after the form was closed"),
    }
}

pub async fn add<E: Entity>(ctx: &Context, assignments: &[String]) -> Result<()> {
    let mut manager = open_manager::<E>(ctx).await?;
    manager.open_add()?;
    fill_and_submit(&mut manager, assignments).await
}

pub async fn edit<E: Entity>(ctx: &Context, id: &str, assignments: &[String]) -> Result<()> {
    let mut manager = open_manager::<E>(ctx).await?;
    manager.open_edit(&RecordId::parse(id))?;
    fill_and_submit(&mut manager, assignments).await
}

pub async fn delete<E: Entity>(ctx: &Context, id: &str) -> Result<()> {
    let mut manager = open_manager::<E>(ctx).await?;
    if manager.delete(&RecordId::parse(id)).await? {
        println!("Deleted {} {}", E::TITLE.to_lowercase(), id);
    } else {
        println!("Cancelled");
    }
    Ok(())
}

/// Validate and store a new account
pub async fn create_account(ctx: &Context, spec: &AccountSpec) -> Result<()> {
    let existing = load_accounts(&ctx.settings).await?;
    AccountService::new().validate(spec, &existing)?;

    let mut manager = open_manager::<UserAccount>(ctx).await?;
    manager.open_add()?;
    let form = spec.to_form(chrono::Local::now().date_naive());
    let assignments: Vec<String> = form.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    fill_and_submit(&mut manager, &assignments).await
}

async fn load_accounts(settings: &DocketSettings) -> Result<Vec<UserAccount>> {
    let path = settings.collection_path(UserAccount::PLURAL)?;
    let store = JsonFileStore::<UserAccount>::open(&path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(store.fetch_all().await?)
}

/// The actor for `username`, or the system actor when none is given
pub async fn resolve_actor(settings: &DocketSettings, username: Option<&str>) -> Result<Actor> {
    let Some(username) = username else {
        return Ok(Actor::system());
    };
    let accounts = load_accounts(settings).await?;
    let account = AccountService::find(&accounts, username)
        .with_context(|| format!("No account named '{}'", username))?;
    Ok(AccountService::new().actor_for(account))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_records::{AnnualStatistic, Case};
    use docket_table::FilterField;
    use pretty_assertions::assert_eq;

    fn schema() -> FilterSchema {
        FilterSchema::new(vec![
            FilterField::text("branch", "Branch"),
            FilterField::date_range("filed_on", "Filed On"),
        ])
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("title=People v. Cruz = Reyes").unwrap(),
            ("title".to_string(), "People v. Cruz = Reyes".to_string())
        );
        assert_eq!(parse_assignment("remarks=").unwrap().1, "");
        assert!(parse_assignment("no-equals").is_err());
        assert!(parse_assignment("=value").is_err());
    }

    #[test]
    fn test_failed_submission_is_not_reported_twice() {
        let error = docket_core::ServiceError::Rejected("Case number already exists".into());
        let err = submission_outcome::<Case>(DrawerEvent::Failed(error)).unwrap_err();
        assert_eq!(err.to_string(), "case was not saved");

        assert_eq!(submission_outcome::<Case>(DrawerEvent::Declined).unwrap(), "Cancelled");
    }

    #[test]
    fn test_parse_text_filter() {
        let (field, value) = parse_filter(&schema(), "branch=RTC 1").unwrap();
        assert_eq!(field, "branch");
        assert_eq!(value, FilterValue::text("RTC 1"));
    }

    #[test]
    fn test_parse_date_range_filter() {
        let (_, value) = parse_filter(&schema(), "filed_on=2024-01-01..2024-06-30").unwrap();
        assert_eq!(
            value,
            FilterValue::range(
                chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
                chrono::NaiveDate::from_ymd_opt(2024, 6, 30)
            )
        );

        let (_, open_start) = parse_filter(&schema(), "filed_on=..2024-06-30").unwrap();
        assert_eq!(
            open_start,
            FilterValue::range(None, chrono::NaiveDate::from_ymd_opt(2024, 6, 30))
        );

        assert!(parse_filter(&schema(), "filed_on=last week").is_err());
        assert!(parse_filter(&schema(), "judge=Santos").is_err());
    }

    #[test]
    fn test_header_labels_prefix_groups() {
        let labels: Vec<String> = header_labels(&AnnualStatistic::columns())
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "Year",
                "Branch",
                "Pending\nStart",
                "Pending\nEnd",
                "Caseload\nFiled",
                "Caseload\nDisposed"
            ]
        );
        assert_eq!(header_labels(&Case::columns()).len(), 7);
    }
}
