use sea_orm::ActiveValue::Set;

use crate::storage::{Click, Link};
use migration::entities::{click, link};

pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        destination_url: model.destination_url,
        short_code: model.short_code,
        title: model.title,
        source: model.source,
        created_at: model.created_at,
        total_clicks: model.total_clicks.max(0),
    }
}

pub fn link_to_active_model(link: &Link) -> link::ActiveModel {
    link::ActiveModel {
        id: Set(link.id.clone()),
        destination_url: Set(link.destination_url.clone()),
        short_code: Set(link.short_code.clone()),
        title: Set(link.title.clone()),
        source: Set(link.source.clone()),
        created_at: Set(link.created_at),
        total_clicks: Set(link.total_clicks),
    }
}

pub fn model_to_click(model: click::Model) -> Click {
    Click {
        id: model.id,
        link_id: model.link_id,
        ip_address: model.ip_address,
        user_agent: model.user_agent,
        referrer: model.referrer,
        country: model.country,
        city: model.city,
        clicked_at: model.clicked_at,
    }
}
