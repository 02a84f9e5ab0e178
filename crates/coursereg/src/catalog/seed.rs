//! The built-in catalog used when no catalog file is configured.

use super::Course;

struct SeedCourse {
    id: &'static str,
    name: &'static str,
    department: &'static str,
    instructor: &'static str,
    schedule: &'static str,
    credits: u32,
    capacity: u32,
    current_enrollment: u32,
}

const SEED: &[SeedCourse] = &[
    SeedCourse {
        id: "CS101",
        name: "Introduction to Programming",
        department: "Computer Science",
        instructor: "Dr. Smith",
        schedule: "MWF 10:00-10:50",
        credits: 3,
        capacity: 30,
        current_enrollment: 25,
    },
    SeedCourse {
        id: "MATH202",
        name: "Calculus II",
        department: "Mathematics",
        instructor: "Prof. Johnson",
        schedule: "TTH 11:00-12:15",
        credits: 4,
        capacity: 25,
        current_enrollment: 18,
    },
    SeedCourse {
        id: "ENG150",
        name: "Composition I",
        department: "English",
        instructor: "Dr. Williams",
        schedule: "MW 13:00-14:15",
        credits: 3,
        capacity: 30,
        current_enrollment: 30,
    },
    SeedCourse {
        id: "PHY210",
        name: "Modern Physics",
        department: "Physics",
        instructor: "Prof. Davis",
        schedule: "TTH 14:00-15:15",
        credits: 4,
        capacity: 20,
        current_enrollment: 12,
    },
    SeedCourse {
        id: "BIO105",
        name: "Cell Biology",
        department: "Biology",
        instructor: "Dr. Wilson",
        schedule: "MWF 09:00-09:50",
        credits: 3,
        capacity: 25,
        current_enrollment: 20,
    },
];

pub(super) fn mock_courses() -> Vec<Course> {
    SEED.iter()
        .map(|c| {
            Course {
                id: c.id.to_string(),
                code: c.id.to_string(),
                name: c.name.to_string(),
                department: c.department.to_string(),
                instructor: c.instructor.to_string(),
                schedule: c.schedule.to_string(),
                meeting: None,
                credits: c.credits,
                capacity: c.capacity,
                current_enrollment: c.current_enrollment,
                active: true,
                prerequisites: Vec::new(),
            }
            .with_parsed_meeting()
        })
        .collect()
}
