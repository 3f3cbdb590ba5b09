//! Tests for update-mask construction.

#[cfg(test)]
mod tests {
    use crate::diff::{
        diff_resource, triggers_operation, DiffInfo, FieldDiff, FieldKind, ObjectSchema,
        ServiceTypeVersion, StringMatch,
    };
    use crate::fieldpath::FieldName;
    use crate::update::{
        masked_request_body, snake_case_update_mask, top_level_update_mask, update_mask,
        update_mask_with_prefix,
    };
    use crate::value::{from_json, Value};
    use pretty_assertions::assert_eq;

    fn diff_at(path: &str) -> FieldDiff {
        let mut name = FieldName::new();
        for segment in path.split('.') {
            match segment.split_once('[') {
                Some((field, index)) => {
                    name = name.add_nest(field);
                    let i = index.trim_end_matches(']').parse().unwrap();
                    name = name.add_index(i);
                }
                None => name = name.add_nest(segment),
            }
        }
        FieldDiff::message(&name, "changed")
    }

    fn diffs(paths: &[&str]) -> Vec<FieldDiff> {
        paths.iter().map(|p| diff_at(p)).collect()
    }

    #[test]
    fn test_mask_dedups_sorts_and_truncates() {
        let d = diffs(&["Http.AuthInfo.Password", "Http.AuthInfo.Password", "Spec.Items[2].Name"]);
        assert_eq!(update_mask(&d), "http.authInfo.password,spec.items");
    }

    #[test]
    fn test_indices_under_one_array_collapse() {
        let d = diffs(&["Items[0].Name", "Items[3].Port", "Description"]);
        assert_eq!(update_mask(&d), "description,items");
    }

    #[test]
    fn test_trailing_wildcard_dropped() {
        let d = diffs(&["Labels.*", "Rules.*.Action"]);
        assert_eq!(update_mask(&d), "labels,rules.*.action");
    }

    #[test]
    fn test_empty_diff_list() {
        assert_eq!(update_mask(&[]), "");
        assert_eq!(top_level_update_mask(&[]), "");
    }

    #[test]
    fn test_top_level_mask() {
        let d = diffs(&["Http.AuthInfo.Password", "Http.Path", "Spec.Items[2].Name", "Name"]);
        assert_eq!(top_level_update_mask(&d), "http,name,spec");
    }

    #[test]
    fn test_snake_case_mask() {
        let d = diffs(&["Http.AuthInfo.Password", "NodeConfig.MachineType"]);
        assert_eq!(snake_case_update_mask(&d), "http.auth_info.password,node_config.machine_type");
    }

    #[test]
    fn test_mask_with_prefix() {
        let d = diffs(&["Http.Path", "Name"]);
        assert_eq!(update_mask_with_prefix(&d, "instance"), "instance.http.path,instance.name");
        assert_eq!(update_mask_with_prefix(&d, "instance."), "instance.http.path,instance.name");
        assert_eq!(update_mask_with_prefix(&d, ""), "http.path,name");
    }

    fn labelled_schema() -> ObjectSchema {
        let update = || DiffInfo::new(FieldKind::map_of(FieldKind::String(StringMatch::Exact)))
            .operation(triggers_operation("update"));
        ObjectSchema::new()
            .field("Labels", update())
            .field("Name", DiffInfo::new(FieldKind::String(StringMatch::Exact)).operation(triggers_operation("update")))
    }

    #[test]
    fn test_map_entry_changes_mask_the_whole_map() {
        let stv = ServiceTypeVersion::new("compute", "Instance", "v1");
        let desired = from_json(r#"{"labels": {"Env": "prod", "app.kubernetes.io/name": "web"}}"#).unwrap();
        let actual = from_json(r#"{"labels": {"Env": "dev", "app.kubernetes.io/name": "api"}}"#).unwrap();

        let diffs = diff_resource(&stv, &desired, &actual, &labelled_schema()).unwrap();
        let names: Vec<&str> = diffs.iter().map(|d| d.field_name.as_str()).collect();
        assert_eq!(names, vec![r#"Labels["Env"]"#, r#"Labels["app.kubernetes.io/name"]"#]);

        assert_eq!(update_mask(&diffs), "labels");
        assert_eq!(snake_case_update_mask(&diffs), "labels");
        let body = masked_request_body(&desired, &diffs).unwrap();
        assert_eq!(Value::Map(body), desired);
    }

    #[test]
    fn test_map_key_under_nested_field() {
        let name = FieldName::new().add_nest("NodeConfig").add_nest("ResourceLabels").add_key("Team.Owner");
        let d = vec![FieldDiff::message(&name, "changed")];
        assert_eq!(update_mask(&d), "nodeConfig.resourceLabels");
        assert_eq!(snake_case_update_mask(&d), "node_config.resource_labels");
    }
}
