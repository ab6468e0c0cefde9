//! End-to-end tests driving the router against an in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use ofertactl_server::db::{create_memory_pool, schema};
use ofertactl_server::{build_router, AppState, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let pool = create_memory_pool().await.unwrap();
    schema::run(&pool).await.unwrap();
    build_router(AppState::new(pool), &ServerConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn field_names(body: &Value) -> Vec<String> {
    body["fields"]
        .as_array()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f["field"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

fn pan_integral() -> Value {
    json!({
        "nombre": "Pan integral",
        "cantidad": 50,
        "precio_unitario": 2.5,
        "fecha_ingreso": Utc::now().to_rfc3339(),
        "estado": "Disponible"
    })
}

fn carlos() -> Value {
    json!({
        "nombre": "Carlos Mendoza",
        "telefono": "0998765432",
        "zona": "Norte"
    })
}

#[tokio::test]
async fn liveness_and_db_health() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/health/db", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn first_product_gets_id_one() {
    let app = app().await;

    let (status, body) = send(&app, "POST", "/inventario-productos", Some(pan_integral())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["nombre"], "Pan integral");
    assert_eq!(body["cantidad"], 50);
    assert_eq!(body["estado"], "Disponible");

    let (status, fetched) = send(&app, "GET", "/inventario-productos/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn invalid_product_reports_every_field() {
    let app = app().await;
    let payload = json!({
        "nombre": "  ",
        "cantidad": -1,
        "precio_unitario": 0.0,
        "fecha_ingreso": Utc::now().to_rfc3339(),
        "estado": "Agotado"
    });

    let (status, body) = send(&app, "POST", "/inventario-productos", Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let fields = field_names(&body);
    for expected in ["nombre", "cantidad", "precio_unitario", "estado"] {
        assert!(fields.iter().any(|f| f == expected), "missing {expected} in {fields:?}");
    }

    let (_, list) = send(&app, "GET", "/inventario-productos", None).await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn offer_window_must_be_ordered() {
    let app = app().await;
    send(&app, "POST", "/inventario-productos", Some(pan_integral())).await;
    let t = Utc::now();

    let valid = json!({
        "producto_id": 1,
        "precio_oferta": 1.5,
        "fecha_inicio": t.to_rfc3339(),
        "fecha_fin": (t + Duration::hours(6)).to_rfc3339()
    });
    let (status, offer) = send(&app, "POST", "/ofertas-reducidas", Some(valid)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(offer["producto_id"], 1);

    let reversed = json!({
        "producto_id": 1,
        "precio_oferta": 1.5,
        "fecha_inicio": (t + Duration::hours(6)).to_rfc3339(),
        "fecha_fin": t.to_rfc3339()
    });
    let (status, body) = send(&app, "POST", "/ofertas-reducidas", Some(reversed)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(field_names(&body), vec!["fecha_fin"]);
}

#[tokio::test]
async fn offer_for_missing_product_is_conflict() {
    let app = app().await;
    let t = Utc::now();
    let payload = json!({
        "producto_id": 42,
        "precio_oferta": 1.0,
        "fecha_inicio": t.to_rfc3339(),
        "fecha_fin": (t + Duration::hours(1)).to_rfc3339()
    });

    let (status, body) = send(&app, "POST", "/ofertas-reducidas", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn deleting_product_removes_its_offers() {
    let app = app().await;
    send(&app, "POST", "/inventario-productos", Some(pan_integral())).await;
    let t = Utc::now();
    let offer = json!({
        "producto_id": 1,
        "precio_oferta": 1.5,
        "fecha_inicio": t.to_rfc3339(),
        "fecha_fin": (t + Duration::hours(6)).to_rfc3339()
    });
    let (_, offer) = send(&app, "POST", "/ofertas-reducidas", Some(offer)).await;
    let offer_uri = format!("/ofertas-reducidas/{}", offer["id"]);

    let (status, body) = send(&app, "DELETE", "/inventario-productos/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "GET", &offer_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", "/inventario-productos/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn products_with_offers_inlined() {
    let app = app().await;
    send(&app, "POST", "/inventario-productos", Some(pan_integral())).await;
    let t = Utc::now();
    for hours in [2, 4] {
        let offer = json!({
            "producto_id": 1,
            "precio_oferta": 1.0,
            "fecha_inicio": t.to_rfc3339(),
            "fecha_fin": (t + Duration::hours(hours)).to_rfc3339()
        });
        send(&app, "POST", "/ofertas-reducidas", Some(offer)).await;
    }

    let (status, body) = send(&app, "GET", "/inventario-productos/1/ofertas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre"], "Pan integral");
    assert_eq!(body["ofertas"].as_array().unwrap().len(), 2);

    let (status, page) = send(&app, "GET", "/inventario-productos?con_ofertas=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"][0]["ofertas"].as_array().unwrap().len(), 2);

    let (_, plain) = send(&app, "GET", "/inventario-productos", None).await;
    assert!(plain["items"][0].get("ofertas").is_none());
}

#[tokio::test]
async fn put_replaces_and_patch_merges() {
    let app = app().await;
    send(&app, "POST", "/inventario-productos", Some(pan_integral())).await;

    let mut replacement = pan_integral();
    replacement["nombre"] = json!("Pan de centeno");
    replacement["cantidad"] = json!(10);
    let (status, body) = send(&app, "PUT", "/inventario-productos/1", Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre"], "Pan de centeno");

    let patch = json!({ "estado": "Vendido", "cantidad": 0 });
    let (status, body) = send(&app, "PATCH", "/inventario-productos/1", Some(patch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre"], "Pan de centeno");
    assert_eq!(body["estado"], "Vendido");
    assert_eq!(body["cantidad"], 0);

    let (status, _) = send(&app, "PUT", "/inventario-productos/9", Some(pan_integral())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn short_phone_is_rejected() {
    let app = app().await;
    let payload = json!({ "nombre": "Ana García", "telefono": "12345" });

    let (status, body) = send(&app, "POST", "/repartidores", Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(field_names(&body), vec!["telefono"]);
}

#[tokio::test]
async fn courier_children_and_cascade() {
    let app = app().await;
    let (status, courier) = send(&app, "POST", "/repartidores", Some(carlos())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(courier["zona"], "Norte");
    let t = Utc::now();

    let delivery = json!({
        "repartidor_id": 1,
        "fecha": (t + Duration::hours(2)).to_rfc3339(),
        "descripcion": "Entrega de pan integral - Cliente preferente"
    });
    let (status, _) = send(&app, "POST", "/entregas", Some(delivery)).await;
    assert_eq!(status, StatusCode::CREATED);

    let route = json!({
        "repartidor_id": 1,
        "destino": "Av. Amazonas y Naciones Unidas",
        "hora_salida": (t + Duration::hours(1)).to_rfc3339()
    });
    let (status, route) = send(&app, "POST", "/rutas-entrega", Some(route)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(route["hora_llegada"], Value::Null);

    let (_, deliveries) = send(&app, "GET", "/repartidores/1/entregas", None).await;
    assert_eq!(deliveries.as_array().unwrap().len(), 1);
    let (_, routes) = send(&app, "GET", "/repartidores/1/rutas", None).await;
    assert_eq!(routes.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", "/repartidores/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/repartidores/1/entregas", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, deliveries) = send(&app, "GET", "/entregas", None).await;
    assert_eq!(deliveries["total"], 0);
    let (_, routes) = send(&app, "GET", "/rutas-entrega", None).await;
    assert_eq!(routes["total"], 0);
}

#[tokio::test]
async fn route_arrival_can_be_recorded_and_cleared() {
    let app = app().await;
    send(&app, "POST", "/repartidores", Some(carlos())).await;
    let t = Utc::now();
    let route = json!({
        "repartidor_id": 1,
        "destino": "Universidad Central",
        "hora_salida": t.to_rfc3339()
    });
    send(&app, "POST", "/rutas-entrega", Some(route)).await;

    let early = json!({ "hora_llegada": (t - Duration::minutes(5)).to_rfc3339() });
    let (status, body) = send(&app, "PATCH", "/rutas-entrega/1", Some(early)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(field_names(&body), vec!["hora_llegada"]);

    let arrival = json!({ "hora_llegada": (t + Duration::minutes(45)).to_rfc3339() });
    let (status, body) = send(&app, "PATCH", "/rutas-entrega/1", Some(arrival)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["hora_llegada"].is_string());

    let cleared = json!({ "hora_llegada": null });
    let (status, body) = send(&app, "PATCH", "/rutas-entrega/1", Some(cleared)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hora_llegada"], Value::Null);
}

#[tokio::test]
async fn delivery_too_far_ahead_is_rejected() {
    let app = app().await;
    send(&app, "POST", "/repartidores", Some(carlos())).await;
    let payload = json!({
        "repartidor_id": 1,
        "fecha": (Utc::now() + Duration::days(400)).to_rfc3339()
    });

    let (status, body) = send(&app, "POST", "/entregas", Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(field_names(&body), vec!["fecha"]);
}

#[tokio::test]
async fn pagination_windows_results() {
    let app = app().await;
    for name in ["Carlos Mendoza", "Ana García", "Luis Rodríguez"] {
        let payload = json!({ "nombre": name, "telefono": "0998765432" });
        send(&app, "POST", "/repartidores", Some(payload)).await;
    }

    let (status, page) = send(&app, "GET", "/repartidores?skip=1&limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["nombre"], "Ana García");

    let (status, body) = send(&app, "GET", "/repartidores?skip=-1", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(field_names(&body), ["query"]);
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/inventario-productos/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) = send(&app, "GET", "/entregas/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/repartidores")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", "/repartidores", Some(json!({ "nombre": "x" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(field_names(&body), ["telefono"]);

    let (status, body) = send(&app, "POST", "/repartidores", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(field_names(&body), ["body"]);
}

#[tokio::test]
async fn empty_body_lists_every_required_field() {
    let app = app().await;

    let (status, body) = send(&app, "POST", "/repartidores", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(field_names(&body), ["nombre", "telefono"]);

    let (status, body) = send(&app, "POST", "/inventario-productos", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        field_names(&body),
        ["nombre", "cantidad", "precio_unitario", "fecha_ingreso", "estado"]
    );

    let (status, body) = send(&app, "POST", "/rutas-entrega", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(field_names(&body), ["repartidor_id", "destino", "hora_salida"]);
}

#[tokio::test]
async fn mistyped_fields_are_named() {
    let app = app().await;
    let mut payload = pan_integral();
    payload["cantidad"] = json!("cincuenta");
    payload["fecha_ingreso"] = json!("ayer");
    payload.as_object_mut().unwrap().remove("estado");

    let (status, body) = send(&app, "POST", "/inventario-productos", Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(field_names(&body), ["cantidad", "fecha_ingreso", "estado"]);

    send(&app, "POST", "/inventario-productos", Some(pan_integral())).await;
    let patch = json!({ "precio_unitario": "barato" });
    let (status, body) = send(&app, "PATCH", "/inventario-productos/1", Some(patch)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(field_names(&body), ["precio_unitario"]);
}

#[tokio::test]
async fn timestamps_without_offset_are_utc() {
    let app = app().await;
    let mut payload = pan_integral();
    payload["fecha_ingreso"] = json!("2024-06-01T10:00:00");

    let (status, body) = send(&app, "POST", "/inventario-productos", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    let stored: chrono::DateTime<Utc> = body["fecha_ingreso"].as_str().unwrap().parse().unwrap();
    assert_eq!(stored.to_rfc3339(), "2024-06-01T10:00:00+00:00");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app().await;
    for uri in [
        "/inventario-productos/5",
        "/inventario-productos/5/ofertas",
        "/ofertas-reducidas/5",
        "/repartidores/5",
        "/repartidores/5/rutas",
        "/entregas/5",
        "/rutas-entrega/5",
    ] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "not_found");
    }
}
