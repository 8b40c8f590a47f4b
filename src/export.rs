//! Excel export functionality.

use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

use crate::models::{Department, TeamMember};

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin)
}

/// Write the header row and column widths.
fn write_headers(worksheet: &mut Worksheet, headers: &[(&str, f64)]) -> Result<(), XlsxError> {
    let format = header_format();
    for (col, (header, width)) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &format)?;
        worksheet.set_column_width(col as u16, *width)?;
    }
    Ok(())
}

/// Autofilter over the data and freeze the header row.
fn finish_sheet(worksheet: &mut Worksheet, rows: usize, columns: u16) -> Result<(), XlsxError> {
    if rows > 0 {
        worksheet.autofilter(0, 0, rows as u32, columns - 1)?;
    }
    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}

/// Export departments to Excel file.
pub fn export_departments_to_excel(departments: &[Department], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Departments")?;

    let headers = [("Name", 30.0), ("Description", 50.0), ("Team Members", 14.0)];
    write_headers(worksheet, &headers)?;

    for (idx, dept) in departments.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, &dept.name)?;
        worksheet.write_string(row, 1, dept.description.as_deref().unwrap_or(""))?;
        worksheet.write_number(row, 2, dept.team_member_count())?;
    }

    finish_sheet(worksheet, departments.len(), headers.len() as u16)?;
    workbook.save(path)?;
    Ok(())
}

/// Export team members to Excel file.
///
/// Image references are written as resolved URLs.
pub fn export_team_to_excel(
    members: &[TeamMember],
    resolve_image: impl Fn(&str) -> String,
    path: &Path,
) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Team")?;

    let headers = [
        ("Name", 28.0),
        ("Designation", 24.0),
        ("Department", 24.0),
        ("Image", 40.0),
        ("Bio", 60.0),
    ];
    write_headers(worksheet, &headers)?;

    for (idx, member) in members.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, &member.name)?;
        worksheet.write_string(row, 1, &member.designation)?;
        worksheet.write_string(row, 2, member.department_name().unwrap_or(""))?;
        let image = member.image.as_deref().map(&resolve_image).unwrap_or_default();
        worksheet.write_string(row, 3, image)?;
        worksheet.write_string(row, 4, &member.bio)?;
    }

    finish_sheet(worksheet, members.len(), headers.len() as u16)?;
    workbook.save(path)?;
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("Excel Files", &["xlsx"])
        .save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("team-admin-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_generate_export_filename() {
        let name = generate_export_filename("departments");
        assert!(name.starts_with("departments_"));
        assert!(name.ends_with(".xlsx"));
    }

    #[test]
    fn test_export_departments_writes_file() {
        let path = temp_path("departments.xlsx");
        let departments: Vec<Department> = serde_json::from_value(json!([
            {"id": "1", "name": "Engineering", "_count": {"teamMembers": 3}},
            {"id": "2", "name": "Design", "description": "Brand"}
        ]))
        .unwrap();

        export_departments_to_excel(&departments, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_export_empty_team_writes_file() {
        let path = temp_path("team.xlsx");
        export_team_to_excel(&[], |r| r.to_string(), &path).unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }
}
