pub mod load_more;
pub mod results_list;
pub mod search_form;
