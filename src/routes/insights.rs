use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

const GENERAL_INFO: &str = "Fertility and hormonal health are closely linked. Hormones such as estrogen, progesterone, and testosterone play a crucial role in regulating the menstrual cycle, ovulation, and overall reproductive health.";

const TIPS: [&str; 5] = [
    "Maintain a Balanced Diet",
    "Stay Active",
    "Manage Stress",
    "Get Adequate Sleep",
    "Avoid Smoking and Excessive Alcohol",
];

const RESOURCES: [(&str, &str); 4] = [
    (
        "Understanding PCOS",
        "https://www.mayoclinic.org/diseases-conditions/pcos/symptoms-causes/syc-20353439",
    ),
    (
        "Menstrual Cycle Basics",
        "https://www.nichd.nih.gov/health/topics/menstruation",
    ),
    (
        "Hormone Therapy",
        "https://www.womenshealth.gov/a-z-topics/hormone-therapy",
    ),
    (
        "Reproductive Health",
        "https://www.cdc.gov/reproductivehealth/index.html",
    ),
];

#[derive(Serialize)]
struct Resource {
    title: &'static str,
    url: &'static str,
}

#[derive(Serialize)]
struct InsightsOverview {
    general_info: &'static str,
    tips: Vec<&'static str>,
    resources: Vec<Resource>,
}

#[derive(Deserialize)]
pub struct PersonalInsightsRequest {
    pub age: u32,
    pub cycle_length: i64,
}

#[derive(Serialize)]
struct PersonalInsightsResponse {
    insights: String,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/insights", get(get_insights))
        .route("/insights/personalized", post(get_personal_insights))
        .with_state(state)
}

async fn get_insights() -> Json<InsightsOverview> {
    Json(InsightsOverview {
        general_info: GENERAL_INFO,
        tips: TIPS.to_vec(),
        resources: RESOURCES
            .iter()
            .map(|&(title, url)| Resource { title, url })
            .collect(),
    })
}

async fn get_personal_insights(
    Json(body): Json<PersonalInsightsRequest>,
) -> Json<PersonalInsightsResponse> {
    Json(PersonalInsightsResponse {
        insights: personalized_text(body.age, body.cycle_length),
    })
}

/// Fixed advisory sentences bucketed by age and configured cycle length.
fn personalized_text(age: u32, cycle_length: i64) -> String {
    let mut text = String::new();

    if age < 20 {
        text.push_str("Young women often experience irregular cycles due to hormonal changes during adolescence. Ensure a balanced diet, moderate exercise, and regular check-ups for reproductive health.");
    } else if age < 35 {
        text.push_str("Women in their 20s and early 30s often have more regular cycles. A healthy lifestyle with nutrient-dense foods and exercise supports hormonal balance and fertility.");
    } else if age < 45 {
        text.push_str("Women in this age range may experience perimenopause symptoms such as cycle irregularities. Staying active, managing stress, and regular check-ups can ease this transition.");
    } else {
        text.push_str("Menopause often starts after 45, leading to changes in hormone levels and cycle patterns. Lifestyle adjustments and health support can help manage these transitions.");
    }

    if cycle_length < 21 {
        text.push_str(" Shorter-than-average cycle lengths may suggest a hormonal imbalance. Consider consulting a healthcare provider.");
    } else if cycle_length > 35 {
        text.push_str(" Longer cycles may indicate conditions such as PCOS or hormonal fluctuations. It's advisable to speak with a healthcare provider.");
    } else {
        text.push_str(" A regular cycle length between 21 and 35 days generally indicates balanced hormones. Maintaining a healthy lifestyle can support this stability.");
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::{local_datetime, ManualClock};
    use crate::store::Store;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            store: Store::new(),
            clock: Arc::new(ManualClock::starting_at(local_datetime(2024, 11, 1, 9, 0))),
        }
    }

    #[test]
    fn every_age_bracket_has_its_own_opening() {
        let teen = personalized_text(17, 28);
        assert!(teen.starts_with("Young women"));

        let twenties = personalized_text(27, 28);
        assert!(twenties.starts_with("Women in their 20s"));

        let forties = personalized_text(40, 28);
        assert!(forties.contains("perimenopause"));

        let fifties = personalized_text(50, 28);
        assert!(fifties.starts_with("Menopause"));
    }

    #[test]
    fn cycle_length_brackets_append_the_right_advice() {
        assert!(personalized_text(27, 19).contains("Shorter-than-average"));
        assert!(personalized_text(27, 40).contains("Longer cycles"));
        assert!(personalized_text(27, 28).contains("between 21 and 35 days"));

        // Bracket edges.
        assert!(personalized_text(27, 21).contains("between 21 and 35 days"));
        assert!(personalized_text(27, 35).contains("between 21 and 35 days"));
    }

    #[tokio::test]
    async fn overview_serves_the_static_content() {
        let response = routes(test_state())
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/insights")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["tips"].as_array().unwrap().len(), 5);
        assert_eq!(body["resources"].as_array().unwrap().len(), 4);
        assert_eq!(body["resources"][0]["title"], json!("Understanding PCOS"));
        assert!(body["general_info"]
            .as_str()
            .unwrap()
            .starts_with("Fertility and hormonal health"));
    }

    #[tokio::test]
    async fn personalized_endpoint_combines_both_brackets() {
        let response = routes(test_state())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/insights/personalized")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"age": 30, "cycle_length": 40}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let text = body["insights"].as_str().unwrap();
        assert!(text.starts_with("Women in their 20s"));
        assert!(text.contains("PCOS"));
    }
}
