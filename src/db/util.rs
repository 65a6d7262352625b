#[derive(Debug, Clone)]
pub struct ColumnMapper {
  pub name: String,
  pub column: String,
}

pub fn column(name: &'static str) -> ColumnMapper {
  ColumnMapper {
    name: name.to_string(),
    column: name.to_string(),
  }
}

pub fn quoted(name: &'static str) -> ColumnMapper {
  ColumnMapper {
    name: name.to_string(),
    column: format!(r#""{}""#, name),
  }
}

#[derive(Debug, Default, Clone)]
pub struct ColumnMappers {
  pub table_name: &'static str,
  pub columns: Vec<ColumnMapper>,
}

impl ColumnMappers {
  pub fn get_columns(&self) -> String {
    self.columns.iter()
      .map(|col| col.column.as_str())
      .collect::<Vec<&str>>()
      .join(", ")
  }

  /// Column reference for `name`, quoted when needed.
  pub fn column<'a>(&'a self, name: &'a str) -> &'a str {
    self.columns.iter()
      .find(|col| col.name == name)
      .map(|col| col.column.as_str())
      .unwrap_or(name)
  }

  pub fn build_select_query(&self) -> String {
    format!("SELECT {} FROM {}", self.get_columns(), self.table_name)
  }

  pub fn build_insert_query(&self) -> String {
    let values = (1..=self.columns.len())
      .map(|idx| format!("${}", idx))
      .collect::<Vec<String>>()
      .join(", ");
    format!("INSERT INTO {}({}) VALUES({})", self.table_name, self.get_columns(), values)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn mappers() -> ColumnMappers {
    ColumnMappers {
      table_name: "articles",
      columns: vec![column("id"), quoted("date"), column("tags")],
    }
  }

  #[test]
  fn select_query() {
    assert_eq!(mappers().build_select_query(), r#"SELECT id, "date", tags FROM articles"#);
  }

  #[test]
  fn insert_query() {
    assert_eq!(mappers().build_insert_query(),
      r#"INSERT INTO articles(id, "date", tags) VALUES($1, $2, $3)"#);
  }

  #[test]
  fn column_lookup() {
    let cols = mappers();
    assert_eq!(cols.column("date"), r#""date""#);
    assert_eq!(cols.column("id"), "id");
  }
}
