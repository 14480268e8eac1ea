use fleet_map_shared::StalenessTier;

use crate::config::IconSet;
use crate::map::MarkerIcon;

pub fn icon_file(tier: StalenessTier) -> &'static str {
    match tier {
        StalenessTier::Fresh => "bus_green.png",
        StalenessTier::Aging => "bus_yellow.png",
        StalenessTier::Stale => "bus_red.png",
    }
}

impl IconSet {
    pub fn url(&self, tier: StalenessTier) -> String {
        let base = self.base_dir.trim_end_matches('/');
        if base.is_empty() {
            return icon_file(tier).to_string();
        }
        format!("{base}/{}", icon_file(tier))
    }

    pub fn icon(&self, tier: StalenessTier) -> MarkerIcon {
        MarkerIcon::Asset {
            url: self.url(tier),
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use fleet_map_shared::StalenessTier;

    use crate::config::IconSet;
    use crate::map::MarkerIcon;

    #[test]
    fn each_tier_has_its_own_asset() {
        let icons = IconSet::default();
        assert_eq!(icons.url(StalenessTier::Fresh), "www/assets/img/bus_green.png");
        assert_eq!(icons.url(StalenessTier::Aging), "www/assets/img/bus_yellow.png");
        assert_eq!(icons.url(StalenessTier::Stale), "www/assets/img/bus_red.png");
    }

    #[test]
    fn base_dir_trailing_slash_is_tolerated() {
        let icons = IconSet::with_base_dir("/static/");
        assert_eq!(icons.url(StalenessTier::Fresh), "/static/bus_green.png");
        assert_eq!(IconSet::with_base_dir("").url(StalenessTier::Stale), "bus_red.png");
    }

    #[test]
    fn icon_carries_display_size() {
        assert_eq!(
            IconSet::default().icon(StalenessTier::Aging),
            MarkerIcon::Asset {
                url: "www/assets/img/bus_yellow.png".to_string(),
                width: 36,
                height: 42,
            }
        );
    }
}
