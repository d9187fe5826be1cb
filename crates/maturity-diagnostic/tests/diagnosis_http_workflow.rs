//! End-to-end diagnosis scenarios through the public service facade and HTTP router.

mod common {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use maturity_diagnostic::workflows::diagnosis::{
        CatalogRepository, DiagnosisId, DiagnosisRecord, DiagnosisService, HistoryRepository,
        Industry, IndustryId, OptionWeightTable, Questionnaire, RepositoryError,
    };

    #[derive(Default)]
    pub(super) struct Catalog {
        industries: Mutex<BTreeMap<IndustryId, Industry>>,
        questionnaires: Mutex<BTreeMap<IndustryId, Questionnaire>>,
        weights: Mutex<BTreeMap<IndustryId, OptionWeightTable>>,
    }

    impl CatalogRepository for Catalog {
        fn industries(&self) -> Result<Vec<Industry>, RepositoryError> {
            Ok(self.industries.lock().unwrap().values().cloned().collect())
        }

        fn industry(&self, id: &IndustryId) -> Result<Option<Industry>, RepositoryError> {
            Ok(self.industries.lock().unwrap().get(id).cloned())
        }

        fn insert_industry(&self, industry: Industry) -> Result<Industry, RepositoryError> {
            let mut guard = self.industries.lock().unwrap();
            if guard.contains_key(&industry.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(industry.id.clone(), industry.clone());
            Ok(industry)
        }

        fn update_industry(&self, industry: Industry) -> Result<(), RepositoryError> {
            self.industries
                .lock()
                .unwrap()
                .insert(industry.id.clone(), industry);
            Ok(())
        }

        fn remove_industry(&self, id: &IndustryId) -> Result<(), RepositoryError> {
            self.questionnaires.lock().unwrap().remove(id);
            self.weights.lock().unwrap().remove(id);
            self.industries
                .lock()
                .unwrap()
                .remove(id)
                .map(|_| ())
                .ok_or(RepositoryError::NotFound)
        }

        fn questionnaire(
            &self,
            id: &IndustryId,
        ) -> Result<Option<Questionnaire>, RepositoryError> {
            Ok(self.questionnaires.lock().unwrap().get(id).cloned())
        }

        fn save_questionnaire(&self, questionnaire: Questionnaire) -> Result<(), RepositoryError> {
            self.questionnaires
                .lock()
                .unwrap()
                .insert(questionnaire.industry_id().clone(), questionnaire);
            Ok(())
        }

        fn weights(&self, id: &IndustryId) -> Result<Option<OptionWeightTable>, RepositoryError> {
            Ok(self.weights.lock().unwrap().get(id).cloned())
        }

        fn save_weights(
            &self,
            id: &IndustryId,
            weights: OptionWeightTable,
        ) -> Result<(), RepositoryError> {
            self.weights.lock().unwrap().insert(id.clone(), weights);
            Ok(())
        }
    }

    #[derive(Default)]
    pub(super) struct History {
        records: Mutex<BTreeMap<DiagnosisId, DiagnosisRecord>>,
    }

    impl HistoryRepository for History {
        fn insert(&self, record: DiagnosisRecord) -> Result<DiagnosisRecord, RepositoryError> {
            let mut guard = self.records.lock().unwrap();
            if guard.contains_key(&record.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        fn fetch(&self, id: &DiagnosisId) -> Result<Option<DiagnosisRecord>, RepositoryError> {
            Ok(self.records.lock().unwrap().get(id).cloned())
        }

        fn list(&self) -> Result<Vec<DiagnosisRecord>, RepositoryError> {
            Ok(self.records.lock().unwrap().values().cloned().collect())
        }

        fn remove(&self, id: &DiagnosisId) -> Result<bool, RepositoryError> {
            Ok(self.records.lock().unwrap().remove(id).is_some())
        }
    }

    pub(super) fn service() -> Arc<DiagnosisService<Catalog, History>> {
        let service =
            DiagnosisService::new(Arc::new(Catalog::default()), Arc::new(History::default()));
        service.seed_standard_catalog().expect("seed succeeds");
        Arc::new(service)
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use maturity_diagnostic::workflows::diagnosis::diagnosis_router;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json payload")
    };
    (status, payload)
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn imported_scope_can_be_diagnosed_and_reviewed() {
    let router = diagnosis_router(common::service());

    let csv = include_str!("../fixtures/perguntas.csv");
    let (status, summary) = send(
        &router,
        Request::post("/api/v1/import/questions")
            .body(Body::from(csv))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["industries_created"], json!(["Varejo", "Indústria"]));
    assert_eq!(summary["industries_updated"], json!(["Geral"]));

    let feedbacks = include_str!("../fixtures/feedbacks.csv");
    let (status, summary) = send(
        &router,
        Request::post("/api/v1/import/feedbacks")
            .body(Body::from(feedbacks))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["sections_updated"], json!(3));
    assert_eq!(summary["missing_industries"], json!(["Logística"]));

    let (_, industries) = send(
        &router,
        Request::get("/api/v1/industries")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let varejo = industries
        .as_array()
        .expect("industry list")
        .iter()
        .find(|industry| industry["name"] == json!("Varejo"))
        .expect("varejo created")["id"]
        .as_str()
        .expect("id is a string")
        .to_string();

    let (_, questionnaire) = send(
        &router,
        Request::get(format!("/api/v1/questions/{varejo}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let vendas = &questionnaire["sections"][0];
    assert_eq!(vendas["title"], json!("Vendas"));
    let first = vendas["questions"][0]["id"].as_str().expect("question id");
    let second = vendas["questions"][1]["id"].as_str().expect("question id");

    let (status, record) = send(
        &router,
        post_json(
            "/api/v1/diagnoses",
            json!({
                "industry_id": varejo,
                "respondent": {
                    "name": "Paula Rocha",
                    "email": "paula@example.com",
                    "company": "Rede Boa Compra",
                    "position": "Controller",
                    "account_executive": "Rafael Prado"
                },
                "answers": { first: 3, second: 3 }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["outcome"]["sections"][0]["score"], json!(100));
    assert_eq!(
        record["outcome"]["sections"][0]["feedback"],
        json!("Gestão comercial orientada por dados.")
    );
    assert_eq!(record["outcome"]["sections"][1]["score"], json!(0));
    assert_eq!(
        record["outcome"]["sections"][1]["feedback"],
        json!("Estoque sem controle.")
    );
    assert_eq!(record["outcome"]["overall_score"], json!(50));
    assert_eq!(record["outcome"]["maturity"], json!("Em Desenvolvimento"));

    let (status, history) = send(
        &router,
        Request::get("/api/v1/history?search=rafael")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["id"], record["id"]);
    assert_eq!(history[0]["company"], json!("Rede Boa Compra"));
}

#[tokio::test]
async fn scope_weights_change_future_scores_only() {
    let service = common::service();
    let router = diagnosis_router(service.clone());

    let submission = json!({
        "industry_id": "default-geral",
        "respondent": { "name": "João Alves", "company": "Alves Ltda" },
        "answers": { "q1": 2 }
    });

    let (_, before) = send(&router, post_json("/api/v1/diagnoses", submission.clone())).await;
    assert_eq!(before["outcome"]["sections"][0]["score"], json!(11));

    let (status, _) = send(
        &router,
        Request::put("/api/v1/scoring/default-geral")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "weights": [0, 40, 70, 100] }).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = send(&router, post_json("/api/v1/diagnoses", submission)).await;
    assert_eq!(after["outcome"]["sections"][0]["score"], json!(12));

    let id = before["id"].as_str().expect("record id");
    let stored = service
        .record(&id.into())
        .expect("first record still stored");
    assert_eq!(stored.outcome.sections[0].score, 11);
}
