use advis_dashboard::{api, state::AppState};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use rstest::rstest;
use serde_json::Value;
use tokio::net::TcpListener;

const ROSTER: &str = "\
Roll,Name,Email,CGPA,Faculty_A,Faculty_B,Faculty_C
101,Asha,asha@uni.edu,9.1,1,2,3
102,Ben,ben@uni.edu,8.7,2,1,3
103,Chen,chen@uni.edu,9.0,3,2,1
";

struct Fixture {
    base_url: String,
    client: reqwest::Client,
}

async fn start_dashboard(max_sessions: usize, max_upload_bytes: usize) -> Fixture {
    let state = AppState::new(max_sessions, max_upload_bytes);
    let app = api::create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Fixture {
        base_url: format!("http://{addr}"),
        client: reqwest::Client::new(),
    }
}

impl Fixture {
    async fn upload(&self, csv: &str) -> reqwest::Response {
        let part = Part::bytes(csv.as_bytes().to_vec())
            .file_name("roster.csv")
            .mime_str("text/csv")
            .unwrap();
        self.client
            .post(format!("{}/uploads", self.base_url))
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .unwrap()
    }

    /// Uploads a roster and returns the upload ID from the preview page.
    async fn upload_id(&self, csv: &str) -> String {
        let response = self.upload(csv).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = response.text().await.unwrap();
        let marker = "action=\"/uploads/";
        let start = html.find(marker).expect("allocate form") + marker.len();
        let end = start + html[start..].find('/').unwrap();
        html[start..end].to_string()
    }
}

#[tokio::test]
async fn upload_allocate_and_download() {
    let fx = start_dashboard(8, 1024 * 1024).await;
    let upload_id = fx.upload_id(ROSTER).await;
    assert!(upload_id.starts_with("upl_"));

    let results = fx
        .client
        .post(format!("{}/uploads/{upload_id}/allocate", fx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(results.status(), StatusCode::OK);
    let html = results.text().await.unwrap();
    assert!(html.contains("Allocation complete"));
    assert!(html.contains("Average CGPA"));
    assert!(html.contains("8.93"));

    let allocation = fx
        .client
        .get(format!("{}/uploads/{upload_id}/allocation.csv", fx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(allocation.status(), StatusCode::OK);
    assert!(allocation
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("student_allocation.csv"));
    assert_eq!(
        allocation.text().await.unwrap(),
        "Roll,Name,Email,CGPA,AssignedFaculty\n\
         101,Asha,asha@uni.edu,9.1,Faculty_A\n\
         103,Chen,chen@uni.edu,9.0,Faculty_B\n\
         102,Ben,ben@uni.edu,8.7,Faculty_C\n"
    );

    let preferences = fx
        .client
        .get(format!("{}/uploads/{upload_id}/preferences.csv", fx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(preferences.status(), StatusCode::OK);
    let csv = preferences.text().await.unwrap();
    assert!(csv.starts_with("Faculty,Rank,Count\nFaculty_A,1,1\nFaculty_A,2,1\nFaculty_A,3,1\n"));
    assert_eq!(csv.lines().count(), 10);
}

#[tokio::test]
async fn download_without_explicit_allocate_computes_report() {
    let fx = start_dashboard(8, 1024 * 1024).await;
    let upload_id = fx.upload_id(ROSTER).await;

    let response = fx
        .client
        .get(format!("{}/uploads/{upload_id}/preferences.csv", fx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case::missing_cgpa("Roll,Name,Email,A\n1,a,b,1\n", "missing required column")]
#[case::empty("Roll,Name,Email,CGPA,A\n", "no student rows")]
#[case::no_faculties("Roll,Name,Email,CGPA\n1,a,b,9\n", "no faculty preference columns")]
#[case::bad_cgpa("Roll,Name,Email,CGPA,A\n1,a,b,high,1\n", "invalid CGPA")]
#[tokio::test]
async fn invalid_upload_shows_error_banner(#[case] csv: &str, #[case] expected: &str) {
    let fx = start_dashboard(8, 1024 * 1024).await;
    let response = fx.upload(csv).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = response.text().await.unwrap();
    assert!(html.contains("banner error"));
    assert!(html.contains(expected), "{html}");
    assert!(!html.contains("/allocate"));
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let fx = start_dashboard(8, 1024 * 1024).await;
    let response = fx
        .client
        .post(format!("{}/uploads", fx.base_url))
        .multipart(Form::new().text("note", "no file here"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let fx = start_dashboard(8, 1024).await;
    let mut csv = String::from("Roll,Name,Email,CGPA,A\n");
    for i in 0..200 {
        csv.push_str(&format!("{i},Student {i},s{i}@uni.edu,8.0,1\n"));
    }
    let response = fx.upload(&csv).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn oldest_session_expires() {
    let fx = start_dashboard(1, 1024 * 1024).await;
    let first = fx.upload_id(ROSTER).await;
    let second = fx.upload_id(ROSTER).await;

    let expired = fx
        .client
        .post(format!("{}/uploads/{first}/allocate", fx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(expired.status(), StatusCode::NOT_FOUND);

    let live = fx
        .client
        .post(format!("{}/uploads/{second}/allocate", fx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(live.status(), StatusCode::OK);
}

#[tokio::test]
async fn json_api_allocates() {
    let fx = start_dashboard(8, 1024 * 1024).await;
    let response = fx
        .client
        .post(format!("{}/v1/allocations", fx.base_url))
        .header("content-type", "text/csv")
        .body(ROSTER)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let assigned: Vec<(&str, &str)> = body["allocations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| {
            (
                a["roll"].as_str().unwrap(),
                a["assigned_faculty"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        assigned,
        [("101", "Faculty_A"), ("103", "Faculty_B"), ("102", "Faculty_C")]
    );
    assert_eq!(body["metrics"]["student_count"], 3);
    assert_eq!(body["metrics"]["faculty_count"], 3);
    assert_eq!(body["assignment_counts"].as_array().unwrap().len(), 3);
    assert_eq!(body["summary"].as_array().unwrap().len(), 9);
    assert!(body["upload_id"].as_str().unwrap().starts_with("upl_"));
}

#[tokio::test]
async fn json_api_reports_missing_column() {
    let fx = start_dashboard(8, 1024 * 1024).await;
    let response = fx
        .client
        .post(format!("{}/v1/allocations", fx.base_url))
        .body("Roll,Name,Email,Faculty_A\n1,a,b,1\n")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "missing_column");
    assert_eq!(body["details"][0]["field"], "CGPA");
    assert!(body.get("allocations").is_none());
}

#[tokio::test]
async fn json_api_rejects_oversized_body() {
    let fx = start_dashboard(8, 1024).await;
    let response = fx
        .client
        .post(format!("{}/v1/allocations", fx.base_url))
        .body("x".repeat(4096))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "payload_too_large");
    assert!(body["request_id"].as_str().unwrap().starts_with("req_"));
}

#[tokio::test]
async fn health_endpoints() {
    let fx = start_dashboard(8, 1024 * 1024).await;
    let response = fx
        .client
        .get(format!("{}/healthz", fx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);

    let live = fx
        .client
        .get(format!("{}/livez", fx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(live.status(), StatusCode::OK);
}
