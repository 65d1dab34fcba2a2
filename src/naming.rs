// Series naming: collectd.<plugin>[.<plugin_instance>].<type>[.<type_instance>]

use crate::models::SampleGroup;

/// First segment of every series name.
pub const METRIC_PREFIX: &str = "collectd";

/// Host label carried on each point: the host up to its first dot.
pub fn short_hostname(host: &str) -> &str {
    host.split_once('.').map_or(host, |(short, _)| short)
}

/// Series name shared by all statistics of a group. Empty instances are left out.
pub fn metric_base_name(group: &SampleGroup) -> String {
    let mut name = String::from(METRIC_PREFIX);
    push_segment(&mut name, &group.plugin);
    if !group.plugin_instance.is_empty() {
        push_segment(&mut name, &group.plugin_instance);
    }
    push_segment(&mut name, &group.type_);
    if !group.type_instance.is_empty() {
        push_segment(&mut name, &group.type_instance);
    }
    name
}

/// Full series name for one statistic of a group.
pub fn series_name(base: &str, dsname: &str) -> String {
    let mut name = String::with_capacity(base.len() + 1 + dsname.len());
    name.push_str(base);
    push_segment(&mut name, dsname);
    name
}

fn push_segment(name: &mut String, segment: &str) {
    name.push('.');
    name.push_str(segment);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hostname_takes_first_label() {
        assert_eq!(short_hostname("web01.example.com"), "web01");
        assert_eq!(short_hostname("web01."), "web01");
    }

    #[test]
    fn short_hostname_without_dot_is_whole_host() {
        assert_eq!(short_hostname("localhost"), "localhost");
        assert_eq!(short_hostname(""), "");
    }

    #[test]
    fn series_name_appends_statistic() {
        assert_eq!(series_name("collectd.load.load", "shortterm"), "collectd.load.load.shortterm");
    }
}
