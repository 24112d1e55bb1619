use crate::models::ExamEntry;

pub const CSV_HEADER: &str = "Date,Day,Subject,Code,Time";

/// One line per exam, fields joined with commas.
///
/// Fields are written verbatim: a comma inside a field is not quoted, so such
/// a row splits into extra columns when read back.
pub fn routine_csv(routine: &[ExamEntry]) -> String {
    let mut lines = Vec::with_capacity(routine.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for exam in routine {
        lines.push(
            [
                exam.date.as_str(),
                exam.day.as_str(),
                exam.subject.as_str(),
                exam.subject_code.as_str(),
                exam.time.as_str(),
            ]
            .join(","),
        );
    }
    lines.join("\n")
}
