use serde::{Deserialize, Serialize};

use crate::services::repo::Service;

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub category_id: i64,
    pub subcategory_id: i64,
    pub division_id: i32,
    pub district_id: i32,
    pub subdistrict_id: i32,
    pub area: String,
    pub title: String,
    pub caption: String,
    pub description: String,
    pub price: String,
    pub features: Option<serde_json::Value>,
    pub hours: Option<String>,
    #[serde(default)]
    pub days: Vec<String>,
    pub page_name: Option<String>,
    pub page_link: Option<String>,
    pub messenger_name: Option<String>,
    pub messenger_link: Option<String>,
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateServiceRequest {
    pub active: Option<bool>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub division_id: Option<i32>,
    pub district_id: Option<i32>,
    pub subdistrict_id: Option<i32>,
    pub area: Option<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub features: Option<serde_json::Value>,
    pub hours: Option<String>,
    pub days: Option<Vec<String>>,
    pub page_name: Option<String>,
    pub page_link: Option<String>,
    pub messenger_name: Option<String>,
    pub messenger_link: Option<String>,
}

impl UpdateServiceRequest {
    pub fn apply(self, service: &mut Service) {
        if let Some(v) = self.active {
            service.active = v;
        }
        if let Some(v) = self.category_id {
            service.category_id = v;
        }
        if let Some(v) = self.subcategory_id {
            service.subcategory_id = v;
        }
        if let Some(v) = self.division_id {
            service.division_id = v;
        }
        if let Some(v) = self.district_id {
            service.district_id = v;
        }
        if let Some(v) = self.subdistrict_id {
            service.subdistrict_id = v;
        }
        if let Some(v) = self.area {
            service.area = v;
        }
        if let Some(v) = self.title {
            service.title = v;
        }
        if let Some(v) = self.caption {
            service.caption = v;
        }
        if let Some(v) = self.description {
            service.description = v;
        }
        if let Some(v) = self.price {
            service.price = v;
        }
        if let Some(v) = self.features {
            service.features = Some(v);
        }
        if let Some(v) = self.hours {
            service.hours = Some(v);
        }
        if let Some(v) = self.days {
            service.days = v;
        }
        if let Some(v) = self.page_name {
            service.page_name = Some(v);
        }
        if let Some(v) = self.page_link {
            service.page_link = Some(v);
        }
        if let Some(v) = self.messenger_name {
            service.messenger_name = Some(v);
        }
        if let Some(v) = self.messenger_link {
            service.messenger_link = Some(v);
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceData {
    pub service: Service,
}

#[derive(Debug, Serialize)]
pub struct ServicesData {
    pub services: Vec<Service>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn base_service() -> Service {
        Service {
            id: 1,
            active: true,
            user_id: 2,
            category_id: 3,
            subcategory_id: 4,
            division_id: 5,
            district_id: 6,
            subdistrict_id: 7,
            area: "Old Town".into(),
            title: "Plumbing".into(),
            caption: "Fast fixes".into(),
            description: "All plumbing work".into(),
            price: "500".into(),
            features: None,
            hours: None,
            days: vec!["mon".into()],
            page_name: None,
            page_link: None,
            messenger_name: None,
            messenger_link: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn partial_update_keeps_absent_fields() {
        let mut service = base_service();
        let req = UpdateServiceRequest {
            title: Some("Plumbing & heating".into()),
            price: Some("600".into()),
            ..Default::default()
        };
        req.apply(&mut service);
        assert_eq!(service.title, "Plumbing & heating");
        assert_eq!(service.price, "600");
        assert_eq!(service.area, "Old Town");
        assert!(service.active);
    }

    #[test]
    fn update_can_deactivate() {
        let mut service = base_service();
        let req = UpdateServiceRequest {
            active: Some(false),
            ..Default::default()
        };
        req.apply(&mut service);
        assert!(!service.active);
    }
}
