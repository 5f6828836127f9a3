//! Lenient decoding of raw `pedidos` documents into [`OrderRecord`]s.
//!
//! Wrong-typed or missing fields read as absent. Only a document that cannot
//! yield an id is dropped.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::models::order::{
    AssignmentState, Dimensions, LegAssignment, OrderRecord, OrderTimestamps, PackageInfo, Party,
    Payment,
};

/// A document as delivered by the store: its document id plus the field map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Default)]
pub struct DecodedSnapshot {
    pub orders: Vec<OrderRecord>,
    pub skipped: usize,
}

/// Decodes every document, preserving input order and counting the ones
/// that had to be dropped.
pub fn decode_snapshot(documents: &[RawDocument]) -> DecodedSnapshot {
    let mut decoded = DecodedSnapshot {
        orders: Vec::with_capacity(documents.len()),
        skipped: 0,
    };

    for document in documents {
        match decode_order(&document.id, &document.data) {
            Some(order) => decoded.orders.push(order),
            None => {
                debug!(document_id = %document.id, "skipping malformed order document");
                decoded.skipped += 1;
            }
        }
    }

    decoded
}

pub fn decode_order(doc_id: &str, data: &Value) -> Option<OrderRecord> {
    if !data.is_object() {
        return None;
    }

    let id = text_at(data, &["id"]).or_else(|| non_blank(doc_id))?;

    Some(OrderRecord {
        id,
        client: decode_party(data.get("proveedor")),
        recipient: decode_party(data.get("destinatario")),
        pickup_assignment: decode_leg(at(data, &["asignacion", "recojo"])),
        delivery_assignment: decode_leg(at(data, &["asignacion", "entrega"])),
        timestamps: decode_timestamps(data.get("fechas")),
        payment: decode_payment(data.get("pago")),
        package: decode_package(data.get("paquete")),
        cancellation_reason: text_at(data, &["destinatario", "direccion", "observaciones"]),
        closed_by_admin: bool_at(data, &["cicloOperativo", "cerradoPorAdmin"]),
    })
}

fn decode_party(value: Option<&Value>) -> Party {
    let Some(value) = value else {
        return Party::default();
    };

    Party {
        name: text_at(value, &["nombre"]),
        phone: text_at(value, &["telefono"]),
        district: text_at(value, &["direccion", "distrito"]),
        address_link: text_at(value, &["direccion", "link"]),
    }
}

fn decode_leg(value: Option<&Value>) -> Option<LegAssignment> {
    let value = value.filter(|value| value.is_object())?;

    Some(LegAssignment {
        driver_name: text_at(value, &["motorizadoNombre"]),
        driver_phone: text_at(value, &["motorizadoTelefono"]),
        route_name: text_at(value, &["rutaNombre"]),
        state: value
            .get("estado")
            .and_then(Value::as_str)
            .map(AssignmentState::from_wire)
            .unwrap_or_default(),
        assigned_at: value.get("asignadaEn").and_then(timestamp),
        pending_reason: text_at(value, &["razonPendiente"]),
    })
}

fn decode_timestamps(value: Option<&Value>) -> OrderTimestamps {
    let Some(value) = value else {
        return OrderTimestamps::default();
    };

    OrderTimestamps {
        created: value.get("creacion").and_then(timestamp),
        scheduled_delivery: value.get("entregaProgramada").and_then(timestamp),
        picked_up_at: value.get("recojo").and_then(timestamp),
        delivered_at: value.get("entrega").and_then(timestamp),
        canceled_at: value.get("anulacion").and_then(timestamp),
    }
}

fn decode_payment(value: Option<&Value>) -> Payment {
    let Some(value) = value else {
        return Payment::default();
    };

    let base_amount = value.get("monto").and_then(decimal).unwrap_or_default();
    let commission = value.get("comision").and_then(decimal).unwrap_or_default();
    let total_amount = value
        .get("montoTotal")
        .and_then(decimal)
        .or_else(|| base_amount.checked_add(commission))
        .unwrap_or_default();

    Payment {
        should_charge: bool_at(value, &["seCobra"]),
        base_amount,
        commission,
        total_amount,
        is_paid: bool_at(value, &["pagado"]),
    }
}

fn decode_package(value: Option<&Value>) -> PackageInfo {
    let Some(value) = value else {
        return PackageInfo::default();
    };

    let length = at(value, &["dimensiones", "largo"]).and_then(number);
    let width = at(value, &["dimensiones", "ancho"]).and_then(number);
    let height = at(value, &["dimensiones", "alto"]).and_then(number);

    let dimensions = match (length, width, height) {
        (Some(length_cm), Some(width_cm), Some(height_cm)) => Some(Dimensions {
            length_cm,
            width_cm,
            height_cm,
        }),
        _ => None,
    };

    let photo_urls = value
        .get("fotosUrls")
        .and_then(Value::as_array)
        .map(|urls| {
            urls.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    PackageInfo {
        dimensions,
        weight_kg: value.get("peso").and_then(number),
        photo_urls,
    }
}

fn at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

fn text_at(value: &Value, path: &[&str]) -> Option<String> {
    at(value, path).and_then(Value::as_str).and_then(non_blank)
}

fn bool_at(value: &Value, path: &[&str]) -> bool {
    at(value, path).and_then(Value::as_bool).unwrap_or(false)
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|number| number.is_finite())
}

fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(integer) => Some(Decimal::from(integer)),
            None => number.as_f64().and_then(Decimal::from_f64),
        },
        Value::String(raw) => raw.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Accepts RFC 3339 strings, `{seconds, nanos}` objects in the store's
/// export spellings, and integer epoch milliseconds.
fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = ["nanos", "nanoseconds", "_nanoseconds"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(Value::as_u64)
                .unwrap_or(0);

            DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::{RawDocument, decode_order, decode_snapshot};
    use crate::models::order::AssignmentState;

    fn full_document() -> serde_json::Value {
        json!({
            "id": "PED-0042",
            "proveedor": {
                "nombre": "Tienda Sol",
                "telefono": "999111222",
                "direccion": { "distrito": "Surquillo", "link": "https://maps.example/a" }
            },
            "destinatario": {
                "nombre": "Ana Quispe",
                "telefono": "988777666",
                "direccion": { "distrito": "Miraflores", "observaciones": "Cliente ausente" }
            },
            "asignacion": {
                "recojo": {
                    "motorizadoNombre": "Luis Rojas",
                    "motorizadoTelefono": "977000111",
                    "estado": "completada",
                    "asignadaEn": "2025-11-08T14:00:00Z"
                },
                "entrega": { "estado": "pendiente", "razonPendiente": "Pendiente de asignación manual" }
            },
            "fechas": {
                "creacion": { "_seconds": 1762600000, "_nanoseconds": 0 },
                "entregaProgramada": "2025-11-09T15:30:00-05:00",
                "recojo": 1762610000000_i64
            },
            "pago": { "seCobra": true, "monto": 20, "comision": 5.5, "pagado": false },
            "paquete": {
                "dimensiones": { "largo": 30, "ancho": 20, "alto": 10 },
                "peso": 2.5,
                "fotosUrls": ["https://img.example/1.jpg", 7]
            },
            "cicloOperativo": { "cerradoPorAdmin": false }
        })
    }

    #[test]
    fn decodes_nested_wire_fields() {
        let order = decode_order("doc-1", &full_document()).unwrap();

        assert_eq!(order.id, "PED-0042");
        assert_eq!(order.client.name.as_deref(), Some("Tienda Sol"));
        assert_eq!(order.client.district.as_deref(), Some("Surquillo"));
        assert_eq!(order.recipient.district.as_deref(), Some("Miraflores"));
        assert_eq!(order.cancellation_reason.as_deref(), Some("Cliente ausente"));

        let pickup = order.pickup_assignment.as_ref().unwrap();
        assert_eq!(pickup.state, AssignmentState::Completed);
        assert_eq!(pickup.driver_name.as_deref(), Some("Luis Rojas"));
        assert_eq!(
            pickup.assigned_at,
            Some(Utc.with_ymd_and_hms(2025, 11, 8, 14, 0, 0).unwrap())
        );

        let delivery = order.delivery_assignment.as_ref().unwrap();
        assert_eq!(delivery.state, AssignmentState::Pending);
        assert_eq!(delivery.driver_name, None);

        assert_eq!(
            order.timestamps.created,
            Some(Utc.timestamp_opt(1_762_600_000, 0).unwrap())
        );
        assert_eq!(
            order.timestamps.scheduled_delivery,
            Some(Utc.with_ymd_and_hms(2025, 11, 9, 20, 30, 0).unwrap())
        );
        assert_eq!(
            order.timestamps.picked_up_at,
            Some(Utc.timestamp_opt(1_762_610_000, 0).unwrap())
        );
        assert_eq!(order.timestamps.delivered_at, None);

        assert!(order.payment.should_charge);
        assert_eq!(order.payment.base_amount, Decimal::from(20));
        assert_eq!(order.payment.total_amount, Decimal::new(255, 1));

        let dimensions = order.package.dimensions.unwrap();
        assert_eq!(dimensions.length_cm, 30.0);
        assert_eq!(order.package.weight_kg, Some(2.5));
        assert_eq!(order.package.photo_urls, vec!["https://img.example/1.jpg"]);
        assert!(!order.closed_by_admin);
    }

    #[test]
    fn wrong_typed_fields_read_as_absent() {
        let data = json!({
            "proveedor": "not-a-map",
            "asignacion": { "entrega": { "motorizadoNombre": 12, "estado": true } },
            "fechas": { "entrega": "yesterday", "anulacion": null },
            "pago": { "montoTotal": "abc", "seCobra": "yes" }
        });

        let order = decode_order("doc-7", &data).unwrap();

        assert_eq!(order.id, "doc-7");
        assert_eq!(order.client.name, None);
        let delivery = order.delivery_assignment.unwrap();
        assert_eq!(delivery.driver_name, None);
        assert_eq!(delivery.state, AssignmentState::None);
        assert_eq!(order.timestamps.delivered_at, None);
        assert_eq!(order.timestamps.canceled_at, None);
        assert!(!order.payment.should_charge);
        assert_eq!(order.payment.total_amount, Decimal::ZERO);
    }

    #[test]
    fn blank_driver_name_is_absent() {
        let data = json!({
            "asignacion": { "entrega": { "motorizadoNombre": "   ", "estado": "asignado" } }
        });

        let order = decode_order("doc-8", &data).unwrap();
        assert_eq!(order.delivery_driver_name(), None);
    }

    #[test]
    fn overflowing_amounts_fall_back_without_panicking() {
        let data = json!({
            "pago": { "monto": "79228162514264337593543950335", "comision": 1, "montoTotal": 10 }
        });
        let order = decode_order("doc-9", &data).unwrap();
        assert_eq!(order.payment.total_amount, Decimal::from(10));
        assert_eq!(order.payment.base_amount, Decimal::MAX);

        let data = json!({
            "pago": { "monto": "79228162514264337593543950335", "comision": 1 }
        });
        let order = decode_order("doc-10", &data).unwrap();
        assert_eq!(order.payment.total_amount, Decimal::ZERO);
    }

    #[test]
    fn documents_without_any_id_are_skipped() {
        let documents = vec![
            RawDocument {
                id: "A".to_string(),
                data: json!({ "proveedor": { "nombre": "Uno" } }),
            },
            RawDocument {
                id: " ".to_string(),
                data: json!({ "id": "" }),
            },
            RawDocument {
                id: "C".to_string(),
                data: json!("scalar"),
            },
            RawDocument {
                id: String::new(),
                data: json!({ "id": "B" }),
            },
        ];

        let decoded = decode_snapshot(&documents);

        let ids: Vec<&str> = decoded.orders.iter().map(|order| order.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(decoded.skipped, 2);
    }
}
