use crate::commands::{persist, CmdMessage, CmdResult};
use crate::error::{LibraryError, Result};
use crate::model::{validate_field, Library, Student, StudentId};
use crate::store::DataStore;
use log::debug;

pub fn add<S: DataStore>(
    lib: &mut Library,
    store: &mut S,
    id: StudentId,
    first_name: &str,
    last_name: &str,
) -> Result<CmdResult> {
    validate_field("first name", first_name)?;
    validate_field("last name", last_name)?;
    if lib.student(&id).is_some() {
        return Err(LibraryError::DuplicateStudent(id.to_string()));
    }

    let student = Student::new(id, first_name.trim().to_string(), last_name.trim().to_string());
    debug!("event=student_add id={}", student.id);
    lib.students.push(student.clone());

    let mut result = CmdResult::default();
    persist(&mut result, "students", store.save_students(&lib.students));
    result.add_message(CmdMessage::success(format!(
        "Student added: {} {}",
        student.id,
        student.full_name()
    )));
    Ok(result.with_students(vec![student]))
}

/// Removes a student from the directory. Loan history is kept.
///
/// Refused while the student holds any copy.
pub fn delete<S: DataStore>(lib: &mut Library, store: &mut S, id: &StudentId) -> Result<CmdResult> {
    let pos = lib
        .students
        .iter()
        .position(|s| &s.id == id)
        .ok_or_else(|| LibraryError::StudentNotFound(id.to_string()))?;
    let held = lib
        .books
        .iter()
        .flat_map(|b| b.copies.iter())
        .filter(|c| c.status.is_held_by(id))
        .count();
    if held > 0 {
        return Err(LibraryError::StudentHoldsCopies {
            student: id.to_string(),
            count: held,
        });
    }
    let removed = lib.students.remove(pos);
    debug!("event=student_delete id={}", id);

    let mut result = CmdResult::default();
    persist(&mut result, "students", store.save_students(&lib.students));
    result.add_message(CmdMessage::success(format!(
        "Student deleted: {} {}",
        removed.id,
        removed.full_name()
    )));
    Ok(result.with_students(vec![removed]))
}

pub fn update<S: DataStore>(
    lib: &mut Library,
    store: &mut S,
    id: &StudentId,
    first_name: &str,
    last_name: &str,
) -> Result<CmdResult> {
    validate_field("first name", first_name)?;
    validate_field("last name", last_name)?;
    let student = lib
        .student_mut(id)
        .ok_or_else(|| LibraryError::StudentNotFound(id.to_string()))?;
    student.first_name = first_name.trim().to_string();
    student.last_name = last_name.trim().to_string();
    let updated = student.clone();

    let mut result = CmdResult::default();
    persist(&mut result, "students", store.save_students(&lib.students));
    result.add_message(CmdMessage::success(format!("Student updated: {}", id)));
    Ok(result.with_students(vec![updated]))
}

/// The student and every history record of theirs, in log order.
pub fn show(lib: &Library, id: &StudentId) -> Result<CmdResult> {
    let student = lib
        .student(id)
        .ok_or_else(|| LibraryError::StudentNotFound(id.to_string()))?;
    let history = lib
        .loans
        .iter()
        .filter(|l| &l.student == id)
        .cloned()
        .collect();
    Ok(CmdResult::default()
        .with_students(vec![student.clone()])
        .with_history(history))
}

pub fn list(lib: &Library) -> Result<CmdResult> {
    let mut result = CmdResult::default().with_students(lib.students.clone());
    if result.students.is_empty() {
        result.add_message(CmdMessage::info("No students."));
    }
    Ok(result)
}
