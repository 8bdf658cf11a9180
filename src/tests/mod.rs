mod day_tests;
