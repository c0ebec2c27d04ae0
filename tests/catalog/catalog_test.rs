#[cfg(test)]
mod tests {
    use tabula::catalog::builtins;
    use tabula::catalog::{Symbol, SymbolCatalog, SymbolKind, TableSchema};
    use tabula::Generation;

    fn sales_schema() -> Vec<TableSchema> {
        vec![
            TableSchema {
                name: "Sales".to_string(),
                members: vec![
                    Symbol::member("[Amount]", "Column on Sales", SymbolKind::Column, "Sales"),
                    Symbol::member(
                        "[Margin]",
                        "Calculated column on Sales",
                        SymbolKind::CalcColumn,
                        "Sales",
                    ),
                    Symbol::member("[Total]", "Measure on Sales", SymbolKind::Measure, "Sales"),
                ],
            },
            TableSchema {
                name: "Dates".to_string(),
                members: vec![Symbol::member(
                    "[Year]",
                    "Column on Dates",
                    SymbolKind::Column,
                    "Dates",
                )],
            },
        ]
    }

    #[test]
    fn test_builtin_catalog_matches_static_tables() {
        let catalog = SymbolCatalog::with_builtins();
        assert_eq!(
            catalog.len(),
            builtins::FUNCTIONS.len() + builtins::KEYWORDS.len()
        );
        assert!(catalog.lookup(SymbolKind::Keyword, None, "EVALUATE").is_some());
    }

    #[test]
    fn test_schema_catalog_keeps_builtins() {
        let catalog = SymbolCatalog::with_schema(sales_schema());
        assert!(catalog.lookup(SymbolKind::Function, None, "SUM").is_some());
        assert!(catalog.lookup(SymbolKind::Table, None, "Sales").is_some());
        assert!(catalog
            .lookup(SymbolKind::Measure, Some("Sales"), "[Total]")
            .is_some());
    }

    #[test]
    fn test_table_order_and_member_order_preserved() {
        let catalog = SymbolCatalog::with_schema(sales_schema());

        let tables: Vec<_> = catalog.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tables, vec!["Sales", "Dates"]);

        let members: Vec<_> = catalog
            .table("Sales")
            .unwrap()
            .members
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(members, vec!["[Amount]", "[Margin]", "[Total]"]);
    }

    #[test]
    fn test_same_name_in_different_tables_does_not_collide() {
        let schema = vec![
            TableSchema {
                name: "A".to_string(),
                members: vec![Symbol::member("[x]", "column of A", SymbolKind::Column, "A")],
            },
            TableSchema {
                name: "B".to_string(),
                members: vec![Symbol::member("[x]", "column of B", SymbolKind::Column, "B")],
            },
        ];
        let catalog = SymbolCatalog::with_schema(schema);

        assert_eq!(
            catalog
                .lookup(SymbolKind::Column, Some("A"), "[x]")
                .map(|s| s.description.as_str()),
            Some("column of A")
        );
        assert_eq!(
            catalog
                .lookup(SymbolKind::Column, Some("B"), "[x]")
                .map(|s| s.description.as_str()),
            Some("column of B")
        );
    }

    #[test]
    fn test_generation_index_covers_schema_and_builtins() {
        let generation = Generation::new(SymbolCatalog::with_schema(sales_schema()));
        let index = generation.index();

        assert!(index.search_exact("SUM").is_some());
        assert!(index.search_exact("Sales").is_some());
        assert!(index.search_exact("[Total]").is_some());

        let bracket_matches: Vec<_> = index
            .search_by_prefix("[")
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(
            bracket_matches,
            vec!["[Amount]", "[Margin]", "[Total]", "[Year]"]
        );
    }
}
