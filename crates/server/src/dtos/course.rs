use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub created_at: NaiveDateTime,
    pub teacher: TeacherResponse,
    pub students: Vec<String>,
    pub average_rating: f64,
}

#[derive(Debug, Serialize)]
pub struct TeacherResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentRequest {
    pub student_email: String,
}
