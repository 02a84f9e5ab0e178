/// Course catalog: lookup, search and loading
mod seed;
mod types;

pub use types::*;

use crate::config::LoadError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// The ordered list of courses students can register for.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    /// Creates a catalog from the given courses, parsing any schedule text
    /// that has not been parsed yet.
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            courses: courses.into_iter().map(Course::with_parsed_meeting).collect(),
        }
    }

    /// The built-in five-course catalog.
    pub fn mock() -> Self {
        Self::new(seed::mock_courses())
    }

    /// Loads a catalog from a JSON array of courses
    ///
    /// # Arguments
    /// * `path` - Path to the catalog file
    ///
    /// # Returns
    /// * `Ok(Catalog)` - The loaded catalog
    /// * `Err(LoadError)` - If the file can't be read or parsed, or breaks a
    ///   catalog invariant (see [`Catalog::check_invariants`])
    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let courses: Vec<Course> =
            serde_json::from_str(&content).map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let catalog = Self::new(courses);
        catalog.check_invariants().map_err(|reason| LoadError::InvalidCatalog {
            path: path.to_path_buf(),
            reason,
        })?;

        info!(
            path = %path.display(),
            courses = catalog.courses.len(),
            "Loaded course catalog"
        );

        let unparsed = catalog.courses.iter().filter(|c| c.meeting.is_none()).count();
        if unparsed > 0 {
            warn!(
                count = unparsed,
                "Some course schedules could not be parsed and will never conflict"
            );
        }

        Ok(catalog)
    }

    /// Checks that course ids are unique, every course is worth credits and
    /// no course is enrolled past its capacity.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for course in &self.courses {
            if !seen.insert(course.id.as_str()) {
                return Err(format!("duplicate course id {}", course.id));
            }
            if course.credits == 0 {
                return Err(format!("course {} has no credits", course.id));
            }
            if course.current_enrollment > course.capacity {
                return Err(format!(
                    "course {} has {} enrolled but capacity {}",
                    course.id, course.current_enrollment, course.capacity
                ));
            }
        }
        Ok(())
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn find(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub fn find_mut(&mut self, course_id: &str) -> Option<&mut Course> {
        self.courses.iter_mut().find(|c| c.id == course_id)
    }

    /// Searches active courses by code, name or department (case-insensitive
    /// substring). An empty query returns every active course.
    pub fn search(&self, query: &str) -> Vec<&Course> {
        let query = query.trim().to_lowercase();

        self.courses
            .iter()
            .filter(|c| c.active)
            .filter(|c| {
                query.is_empty()
                    || c.code.to_lowercase().contains(&query)
                    || c.name.to_lowercase().contains(&query)
                    || c.department.to_lowercase().contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_catalog_parses_every_schedule() {
        let catalog = Catalog::mock();
        assert_eq!(catalog.courses().len(), 5);
        assert!(catalog.courses().iter().all(|c| c.meeting.is_some()));
        assert!(catalog.find("ENG150").unwrap().is_full());
    }

    #[test]
    fn test_search_matches_code_name_and_department() {
        let catalog = Catalog::mock();

        let ids = |q: &str| -> Vec<String> {
            catalog.search(q).into_iter().map(|c| c.id.clone()).collect()
        };

        assert_eq!(ids("cs1"), vec!["CS101"]);
        assert_eq!(ids("calculus"), vec!["MATH202"]);
        assert_eq!(ids("BIOLOGY"), vec!["BIO105"]);
        assert_eq!(ids("").len(), 5);
        assert!(ids("astronomy").is_empty());
    }

    #[test]
    fn test_search_skips_inactive_courses() {
        let mut courses = seed::mock_courses();
        courses[0].active = false;
        let catalog = Catalog::new(courses);

        assert!(catalog.search("CS101").is_empty());
        assert_eq!(catalog.search("").len(), 4);
        assert!(catalog.find("CS101").is_some());
    }

    #[test]
    fn test_load_from_file_parses_schedules() {
        let path =
            std::env::temp_dir().join(format!("coursereg-catalog-{}.json", std::process::id()));
        let json = r#"[{
            "id": "HIST210",
            "code": "HIST210",
            "name": "World History",
            "department": "History",
            "instructor": "Dr. Lee",
            "schedule": "TuTh 09:30-10:45",
            "credits": 3,
            "capacity": 35,
            "current_enrollment": 0,
            "prerequisites": ["HIST101"]
        }]"#;
        fs::write(&path, json).unwrap();

        let catalog = Catalog::load_from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        let course = catalog.find("HIST210").unwrap();
        assert!(course.active);
        assert_eq!(course.prerequisites, vec!["HIST101"]);
        assert_eq!(course.meeting.unwrap().start_minute(), 570);
    }

    #[test]
    fn test_mock_catalog_satisfies_invariants() {
        assert!(Catalog::mock().check_invariants().is_ok());
    }

    #[test]
    fn test_invariants_reject_bad_courses() {
        let mut duplicated = seed::mock_courses();
        duplicated[1].id = "CS101".to_string();
        let reason = Catalog::new(duplicated).check_invariants().unwrap_err();
        assert_eq!(reason, "duplicate course id CS101");

        let mut no_credits = seed::mock_courses();
        no_credits[2].credits = 0;
        let reason = Catalog::new(no_credits).check_invariants().unwrap_err();
        assert_eq!(reason, "course ENG150 has no credits");

        let mut overfull = seed::mock_courses();
        overfull[3].current_enrollment = 21;
        let reason = Catalog::new(overfull).check_invariants().unwrap_err();
        assert_eq!(reason, "course PHY210 has 21 enrolled but capacity 20");
    }

    #[test]
    fn test_load_from_file_rejects_duplicate_ids() {
        let path = std::env::temp_dir().join(format!(
            "coursereg-catalog-dup-{}.json",
            std::process::id()
        ));
        let course = r#"{
            "id": "DUP1",
            "code": "DUP1",
            "name": "Duplicate",
            "department": "Testing",
            "instructor": "Staff",
            "schedule": "MW 08:00-08:50",
            "credits": 3,
            "capacity": 10,
            "current_enrollment": 0
        }"#;
        fs::write(&path, format!("[{course}, {course}]")).unwrap();

        let err = Catalog::load_from_file(&path).unwrap_err();
        fs::remove_file(&path).ok();

        match err {
            LoadError::InvalidCatalog { reason, .. } => {
                assert_eq!(reason, "duplicate course id DUP1")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let err = Catalog::load_from_file(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
